//! Render L-system preset or JSON configuration into PNG or SVG file
use lsysviz::*;
use std::{
    env,
    fs::File,
    io::{BufWriter, Write},
};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    config: RenderConfig,
    output_file: String,
    bit_depth: BitDepth,
    stroke: String,
    stroke_width: Scalar,
}

impl Args {
    fn usage(cmd: &str) -> ! {
        eprintln!("Render L-system plant into PNG or SVG image");
        eprintln!("\nUSAGE:");
        eprintln!(
            "    {} [-p <preset>] [-c <config.json>] [-r <rule>] [-a <axiom>] [-n <iterations>] [-W <width>] [-H <height>] [-m <margin>] [-1] <out.png|out.svg>",
            cmd
        );
        eprintln!("\nARGS:");
        eprintln!("    -l                 list presets and exit");
        eprintln!("    -p <preset>        start from preset");
        eprintln!("    -c <config.json>   start from JSON configuration");
        eprintln!("    -a <axiom>         axiom");
        eprintln!("    -r <rule>          rule in the symbol=replacement form, can be repeated");
        eprintln!("    -n <iterations>    number of rewriting passes");
        eprintln!("    -A <angle>         turn angle in degrees");
        eprintln!("    -s <step>          step length");
        eprintln!("    -W <width>         width in pixels");
        eprintln!("    -H <height>        height in pixels");
        eprintln!("    -m <margin>        margin as a fraction of the canvas");
        eprintln!("    -1                 one bit per pixel PNG");
        eprintln!("    -fg <color>        SVG stroke color");
        eprintln!("    -sw <width>        SVG stroke width");
        eprintln!("    <out>              output file, `.svg` extension selects SVG ('-' means stdout)");
        std::process::exit(1);
    }

    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            config: RenderConfig::default(),
            output_file: String::new(),
            bit_depth: BitDepth::Eight,
            stroke: SvgStyle::default().stroke,
            stroke_width: 1.0,
        };
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "render".to_owned());
        let mut positional = 0;
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => Self::usage(&cmd),
                "-l" => {
                    for preset in PRESETS {
                        println!("{:<8}{}", preset.name, preset.description);
                    }
                    std::process::exit(0);
                }
                "-p" => {
                    let name = args.next().ok_or("-p requires argument")?;
                    let config = RenderConfig::from_preset(Preset::by_name(&name)?);
                    result.config = RenderConfig {
                        width: result.config.width,
                        height: result.config.height,
                        margin: result.config.margin,
                        ..config
                    };
                }
                "-c" => {
                    let path = args.next().ok_or("-c requires argument")?;
                    let json = std::fs::read_to_string(path)?;
                    result.config = RenderConfig::from_json(&json)?;
                }
                "-a" => {
                    result.config.axiom = args.next().ok_or("-a requires argument")?;
                }
                "-r" => {
                    let rule = args.next().ok_or("-r requires argument")?;
                    result.config = result.config.with_rule(&rule)?;
                }
                "-n" => {
                    result.config.iterations = args.next().ok_or("-n requires argument")?.parse()?;
                }
                "-A" => {
                    result.config.angle = args.next().ok_or("-A requires argument")?.parse()?;
                }
                "-s" => {
                    result.config.step = args.next().ok_or("-s requires argument")?.parse()?;
                }
                "-W" => {
                    result.config.width = args.next().ok_or("-W requires argument")?.parse()?;
                }
                "-H" => {
                    result.config.height = args.next().ok_or("-H requires argument")?.parse()?;
                }
                "-m" => {
                    result.config.margin = args.next().ok_or("-m requires argument")?.parse()?;
                }
                "-1" => {
                    result.bit_depth = BitDepth::One;
                }
                "-fg" => {
                    result.stroke = args.next().ok_or("-fg requires argument")?;
                }
                "-sw" => {
                    result.stroke_width = args.next().ok_or("-sw requires argument")?.parse()?;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.output_file = arg,
                        _ => return Err("unexpected positional argument".into()),
                    }
                }
            }
        }
        if positional < 1 {
            Self::usage(&cmd);
        }
        Ok(result)
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    args.config.validate()?;
    tracing::debug!("[config] {:?}", args.config);

    let data = if args.output_file.ends_with(".svg") {
        args.config
            .render_svg(&args.stroke, args.stroke_width)?
            .into_bytes()
    } else {
        let encoder = PngEncoder::new().with_bit_depth(args.bit_depth);
        args.config.render_encoder(&encoder)?
    };

    let mut output: Box<dyn Write> = if args.output_file != "-" {
        Box::new(BufWriter::new(File::create(&args.output_file)?))
    } else {
        Box::new(BufWriter::new(std::io::stdout()))
    };
    tracing::debug_span!("[save]").in_scope(|| {
        output.write_all(&data)?;
        output.flush()
    })?;

    Ok(())
}
