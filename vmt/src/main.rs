use color_print::cformat;
use std::path::Path;
use vmt::error::Error;
use vmt::parser;
use vmt::parser::Command;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: String,

    /// Output file (default: input with the extension swapped to .asm)
    #[clap(short, long)]
    output: Option<String>,

    /// Dump classified commands
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Hack VM Translator");

    println!("1. Read Source");
    println!("  < {}", args.input);
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => fail(&args.input, Error::FileRead(args.input.clone(), err)),
    };
    let basename = Path::new(&args.input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(args.input.as_str())
        .to_string();

    println!("2. Translate Commands");
    if args.dump {
        let mut scanner = parser::Parser::new(&args.input, &source);
        while scanner.has_more() {
            let line = scanner.advance();
            let rendered = match Command::parse(line) {
                Ok(command) => command.cformat(),
                Err(_) => cformat!("<red,bold>! ERROR</>"),
            };
            println!("| {:>4} | {}", line.no(), rendered);
        }
    }
    let mut buf: Vec<u8> = Vec::new();
    let msgs = match vmt::translate(&basename, &source, &mut buf) {
        Ok(msgs) => msgs,
        Err(err) => fail(&args.input, err),
    };
    msgs.print(&args.input);

    // The output file is only created once the whole input has translated.
    let output = args
        .output
        .unwrap_or_else(|| swap_extension(&args.input));
    println!("3. Write Assembly");
    println!("  > {}", output);
    if let Err(err) = std::fs::write(&output, &buf) {
        fail(&args.input, Error::FileWrite(output, err));
    }
}

fn swap_extension(path: &str) -> String {
    Path::new(path).with_extension("asm").to_string_lossy().into_owned()
}

fn fail(file: &str, err: Error) -> ! {
    err.print_diag(file);
    std::process::exit(1);
}
