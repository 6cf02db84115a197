use std::io::Read;
use std::path::{Path, PathBuf};

use tikzmill::display::PLAIN_TEXT;
use tikzmill::{
    DisplayPayload, DisplaySink, RenderRequest, Renderer, ToolchainConfig, parse_size,
    split_csv_list,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Render(tikzmill::Error),
    NoOutput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::NoOutput => write!(f, "No output produced"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tikzmill::Error> for CliError {
    fn from(value: tikzmill::Error) -> Self {
        Self::Render(value)
    }
}

#[derive(Debug)]
struct Args {
    input: Option<String>,
    out: Option<String>,
    save: Option<String>,
    toolchain: Option<String>,
    scale: String,
    width: u32,
    height: u32,
    format: String,
    encoding: String,
    preamble: String,
    packages: Vec<String>,
    libraries: Vec<String>,
    dry_run: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            out: None,
            save: None,
            toolchain: None,
            scale: "1".to_string(),
            width: 400,
            height: 240,
            format: "png".to_string(),
            encoding: "utf-8".to_string(),
            preamble: String::new(),
            packages: Vec::new(),
            libraries: Vec::new(),
            dry_run: false,
        }
    }
}

fn usage() -> &'static str {
    "tikzmill-cli\n\
\n\
USAGE:\n\
  tikzmill-cli [--scale <n>] [--size <w,h>] [--format png|svg|jpg|jpeg] [--encoding <label>] [--preamble <tex>] [--package <a,b>] [--library <a,b>] [--save <path>] [--toolchain <config.json>] [--out <path>|-] [--dry-run] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', TikZ code is read from stdin.\n\
  - --dry-run prints the generated LaTeX document instead of compiling it.\n\
  - Compile failures print the LaTeX log to stdout.\n\
  - Image output defaults to writing next to the input file (or ./out.<format> for stdin).\n\
  - --toolchain points at a JSON file naming the latex/pdf2svg/convert commands.\n\
  - RUST_LOG controls operator diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--dry-run" => args.dry_run = true,
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.clone();
            }
            "--size" => {
                let Some(size) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let (width, height) = parse_size(size).map_err(|_| CliError::Usage(usage()))?;
                args.width = width;
                args.height = height;
            }
            "--format" => {
                let Some(format) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = format.trim().to_string();
            }
            "--encoding" => {
                let Some(encoding) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.encoding = encoding.clone();
            }
            "--preamble" => {
                let Some(preamble) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preamble = preamble.clone();
            }
            "--package" => {
                let Some(packages) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.packages = split_csv_list(packages);
            }
            "--library" => {
                let Some(libraries) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.libraries = split_csv_list(libraries);
            }
            "--save" => {
                let Some(save) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.save = Some(save.clone());
            }
            "--toolchain" => {
                let Some(toolchain) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.toolchain = Some(toolchain.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                while it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn default_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

/// Prints plain-text payloads (dry-run documents, LaTeX logs) to stdout and
/// writes image payloads to the chosen output path.
struct CliSink {
    input: Option<String>,
    out: Option<String>,
    format: String,
    published: usize,
}

impl DisplaySink for CliSink {
    fn publish(&mut self, payload: DisplayPayload) -> tikzmill::Result<()> {
        self.published += 1;

        if let Some(bytes) = payload.get(PLAIN_TEXT) {
            print!("{}", String::from_utf8_lossy(bytes));
            return Ok(());
        }

        for bytes in payload.data.values() {
            match self.out.as_deref() {
                Some("-") => {
                    use std::io::Write;
                    std::io::stdout().lock().write_all(bytes)?;
                }
                Some(path) => std::fs::write(path, bytes)?,
                None => {
                    let out = default_out_path(self.input.as_deref(), &self.format);
                    std::fs::write(out, bytes)?;
                }
            }
        }
        Ok(())
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let code = read_input(args.input.as_deref())?;

    let toolchain = match args.toolchain.as_deref() {
        Some(path) => ToolchainConfig::from_json_file(Path::new(path))?,
        None => ToolchainConfig::default(),
    };

    let request = RenderRequest {
        code,
        scale: args.scale.clone(),
        width: args.width,
        height: args.height,
        format: args.format.clone(),
        encoding: args.encoding.clone(),
        preamble: args.preamble.clone(),
        packages: args.packages.clone(),
        libraries: args.libraries.clone(),
        save_path: args.save.as_deref().map(PathBuf::from),
        dry_run: args.dry_run,
    };

    let mut sink = CliSink {
        input: args.input.clone(),
        out: args.out.clone(),
        format: args.format.clone(),
        published: 0,
    };
    Renderer::new()
        .with_toolchain(toolchain)
        .render(&request, &mut sink)?;

    if sink.published == 0 {
        return Err(CliError::NoOutput);
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::NoOutput) => {
            eprintln!("{}", CliError::NoOutput);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
