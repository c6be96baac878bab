extern crate cinebmp_core;
extern crate cinebmp_commonfmt;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::exit;

use cinebmp_core::codecs::*;
use cinebmp_core::demuxers::{DemuxerError, ImageDemuxCore};
use cinebmp_core::muxers::MuxerError;
use cinebmp_commonfmt::generic_register_all_decoders;
use cinebmp_commonfmt::demuxers::bmp::BMPDemuxer;
use cinebmp_commonfmt::muxers::bmp::write_bmp;

const TOOL_OPTIONS: &[NAOptionDefinition] = &[
    NAOptionDefinition {
        name: QUIET_OPTION, description: QUIET_OPTION_DESC,
        opt_type: NAOptionDefinitionType::Bool },
    NAOptionDefinition {
        name: STRICT_OPTION, description: STRICT_OPTION_DESC,
        opt_type: NAOptionDefinitionType::Bool },
];

#[derive(Debug,Clone,Copy,PartialEq)]
enum ConvError {
    InputError,
    OutputError,
    NotCinepak,
    Damaged(usize),
    Demux(DemuxerError),
    Decode(DecoderError),
    Mux(MuxerError),
}

impl From<DemuxerError> for ConvError {
    fn from(err: DemuxerError) -> Self { ConvError::Demux(err) }
}

impl From<DecoderError> for ConvError {
    fn from(err: DecoderError) -> Self { ConvError::Decode(err) }
}

impl From<MuxerError> for ConvError {
    fn from(err: MuxerError) -> Self { ConvError::Mux(err) }
}

impl fmt::Display for ConvError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConvError::InputError       => write!(f, "cannot open input file"),
            ConvError::OutputError      => write!(f, "cannot create output file"),
            ConvError::NotCinepak       => write!(f, "not a Cinepak bitmap"),
            ConvError::Damaged(count)   => write!(f, "{} damaged chunk(s) in the picture", count),
            ConvError::Demux(DemuxerError::InvalidData)    => write!(f, "not a valid bitmap image"),
            ConvError::Demux(DemuxerError::NotImplemented) => write!(f, "not a Windows v3 bitmap"),
            ConvError::Demux(err)       => write!(f, "error reading bitmap headers: {:?}", err),
            ConvError::Decode(err)      => write!(f, "error decoding picture: {:?}", err),
            ConvError::Mux(err)         => write!(f, "error writing output: {:?}", err),
        }
    }
}

struct ConvSettings {
    quiet:  bool,
    strict: bool,
}

impl ConvSettings {
    fn new() -> Self {
        Self { quiet: false, strict: false }
    }
}

impl NAOptionHandler for ConvSettings {
    fn get_supported_options(&self) -> &[NAOptionDefinition] { TOOL_OPTIONS }
    fn set_options(&mut self, options: &[NAOption]) {
        for option in options.iter() {
            match (option.name, &option.value) {
                (QUIET_OPTION, NAValue::Bool(val))  => self.quiet  = *val,
                (STRICT_OPTION, NAValue::Bool(val)) => self.strict = *val,
                _ => {},
            };
        }
    }
    fn query_option_value(&self, name: &str) -> Option<NAValue> {
        match name {
            QUIET_OPTION  => Some(NAValue::Bool(self.quiet)),
            STRICT_OPTION => Some(NAValue::Bool(self.strict)),
            _ => None,
        }
    }
}

fn print_usage() {
    println!("usage: cinebmp [options] <input.bmp> <output.bmp>");
    println!("options:");
    for opt in TOOL_OPTIONS.iter() {
        println!("  --{}", opt);
    }
}

fn parse_args(args: &[String]) -> Option<(Vec<NAOption>, Vec<String>)> {
    let mut options = Vec::new();
    let mut names = Vec::new();
    for arg in args.iter() {
        if !arg.starts_with("--") {
            names.push(arg.clone());
            continue;
        }
        let mut found = false;
        for opt_def in TOOL_OPTIONS.iter() {
            match opt_def.parse(arg) {
                Ok(opt) => {
                    options.push(opt);
                    found = true;
                    break;
                },
                Err(OptionError::WrongName) => {},
                Err(_) => {
                    println!("invalid option {}", arg);
                    return None;
                },
            };
        }
        if !found {
            println!("unknown option {}", arg);
            return None;
        }
    }
    Some((options, names))
}

fn convert(settings: &ConvSettings, in_name: &str, out_name: &str) -> Result<(), ConvError> {
    let file = File::open(in_name).map_err(|_| ConvError::InputError)?;
    let mut fr = FileReader::new_read(BufReader::new(file));
    let mut br = ByteReader::new(&mut fr);

    let info = {
            let mut dmx = BMPDemuxer::new(&mut br);
            dmx.open()?;
            dmx.get_image_info()?
        };
    if info.codec_name != "cinepak" {
        return Err(ConvError::NotCinepak);
    }
    if !settings.quiet {
        println!(" input: {} picture, data at {}", info.vinfo, info.data_offset);
    }

    let mut dec_reg = RegisteredDecoders::new();
    generic_register_all_decoders(&mut dec_reg);
    let decfunc = dec_reg.find_decoder(info.codec_name).ok_or(ConvError::NotCinepak)?;
    let mut dec = (decfunc)();

    let ret = dec.decode(&mut br).map(|_| ()).map_err(ConvError::from);
    let truncated = dec.get_truncated_chunks();
    let ras = match dec.get_raster() {
            Some(ras) => ras,
            None => return Err(ret.err().unwrap_or(ConvError::Decode(DecoderError::Bug))),
        };
    if !settings.quiet {
        println!(" decoded {} picture, {} damaged chunk(s) skipped", ras.get_info(), truncated);
    }

    let ofile = File::create(out_name).map_err(|_| ConvError::OutputError)?;
    let mut fw = FileWriter::new_write(BufWriter::new(ofile));
    let mut bw = ByteWriter::new(&mut fw);
    write_bmp(&mut bw, ras)?;

    ret?;
    if settings.strict && truncated > 0 {
        return Err(ConvError::Damaged(truncated));
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, names) = match parse_args(&args) {
            Some(ret) => ret,
            None => {
                print_usage();
                exit(1);
            },
        };
    let mut settings = ConvSettings::new();
    settings.set_options(&options);

    if names.len() != 2 {
        print_usage();
        exit(1);
    }
    if !settings.quiet {
        println!("Cinepak BMP to raw BMP converter");
    }
    match convert(&settings, &names[0], &names[1]) {
        Ok(()) => {
            if !settings.quiet {
                println!("All done!");
            }
        },
        Err(err) => {
            eprintln!("{}: {}", names[0], err);
            exit(1);
        },
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn to_args(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn temp_name(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("cinebmp-{}-{}", std::process::id(), name));
        path
    }

    // 8x4 picture, both blocks use V1 entry 0
    fn make_cinepak_bmp(fcc: &[u8; 4], vec_data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut gw = GrowableMemoryWriter::new_write(&mut buf);
            let mut bw = ByteWriter::new(&mut gw);
            bw.write_buf(b"BM").unwrap();
            bw.write_u32le(0).unwrap();
            bw.write_u32le(0).unwrap();
            bw.write_u32le(54).unwrap();
            bw.write_u32le(40).unwrap();
            bw.write_u32le(8).unwrap();
            bw.write_u32le(4).unwrap();
            bw.write_u16le(1).unwrap();
            bw.write_u16le(24).unwrap();
            bw.write_buf(fcc).unwrap();
            for _ in 0..5 {
                bw.write_u32le(0).unwrap();
            }

            let mut cb = vec![0u8; 256 * 6];
            cb[..6].copy_from_slice(&[100, 100, 100, 100, 22, 22]);
            let strip_len = 12 + (4 + cb.len()) + (4 + vec_data.len());
            bw.write_byte(0x00).unwrap();
            bw.write_u24be((10 + strip_len) as u32).unwrap();
            bw.write_u16be(8).unwrap();
            bw.write_u16be(4).unwrap();
            bw.write_u16be(1).unwrap();
            bw.write_u16be(0x1000).unwrap();
            bw.write_u16be(strip_len as u16).unwrap();
            bw.write_u16be(0).unwrap();
            bw.write_u16be(0).unwrap();
            bw.write_u16be(4).unwrap();
            bw.write_u16be(8).unwrap();
            bw.write_byte(0x22).unwrap();
            bw.write_u24be((4 + cb.len()) as u32).unwrap();
            bw.write_buf(&cb).unwrap();
            bw.write_byte(0x32).unwrap();
            bw.write_u24be((4 + vec_data.len()) as u32).unwrap();
            bw.write_buf(vec_data).unwrap();
        }
        buf
    }

    #[test]
    fn test_args() {
        let (options, names) = parse_args(&to_args(&["--quiet", "in.bmp", "--strict", "out.bmp"])).unwrap();
        assert_eq!(names, to_args(&["in.bmp", "out.bmp"]));
        let mut settings = ConvSettings::new();
        settings.set_options(&options);
        assert!(settings.quiet && settings.strict);
        assert_eq!(settings.query_option_value(QUIET_OPTION), Some(NAValue::Bool(true)));
        assert_eq!(settings.query_option_value("verbose"), None);

        let (options, _) = parse_args(&to_args(&["--noquiet"])).unwrap();
        settings.set_options(&options);
        assert!(!settings.quiet);
        assert_eq!(settings.get_supported_options().len(), 2);

        assert!(parse_args(&to_args(&["--verbose", "in.bmp"])).is_none());
    }

    #[test]
    fn test_convert() {
        let in_name = temp_name("in.bmp");
        let out_name = temp_name("out.bmp");
        fs::write(&in_name, make_cinepak_bmp(b"cvid", &[0, 0])).unwrap();

        let settings = ConvSettings { quiet: true, strict: false };
        assert_eq!(convert(&settings, in_name.to_str().unwrap(), out_name.to_str().unwrap()), Ok(()));
        let out = fs::read(&out_name).unwrap();
        assert_eq!(out.len(), 54 + 24 * 4);
        assert_eq!(&out[..2], b"BM");
        for pix in out[54..].chunks(3) {
            assert_eq!(pix, &[144, 67, 144]);
        }

        // second block is missing
        fs::write(&in_name, make_cinepak_bmp(b"cvid", &[0])).unwrap();
        assert_eq!(convert(&settings, in_name.to_str().unwrap(), out_name.to_str().unwrap()), Ok(()));
        let strict = ConvSettings { quiet: true, strict: true };
        assert_eq!(convert(&strict, in_name.to_str().unwrap(), out_name.to_str().unwrap()), Err(ConvError::Damaged(1)));
        assert_eq!(fs::read(&out_name).unwrap().len(), 54 + 24 * 4);

        fs::write(&in_name, make_cinepak_bmp(b"MSVC", &[0, 0])).unwrap();
        assert_eq!(convert(&settings, in_name.to_str().unwrap(), out_name.to_str().unwrap()), Err(ConvError::NotCinepak));

        let missing = temp_name("missing.bmp");
        assert_eq!(convert(&settings, missing.to_str().unwrap(), out_name.to_str().unwrap()), Err(ConvError::InputError));

        let _ = fs::remove_file(&in_name);
        let _ = fs::remove_file(&out_name);
    }
}
