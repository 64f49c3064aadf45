// obj2p - ZX81 tape image builder
// Wraps a raw machine code object file in a .p file that runs it on load

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use obj2p::config::Config;
use obj2p::zx81::tape_file::{read_object_file, write_tape_file};
use obj2p::zx81::{ExecAddress, TapeImage, TapeName, Zx81Converter};

struct Options {
    object_file: String,
    output_name: String,
    exec_address: Option<String>,
    config_file: Option<PathBuf>,
    to_stdout: bool,
    verbose: bool,
}

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("obj2p");

    if args.len() < 2 {
        print_usage(program_name);
        process::exit(1);
    }

    let mut positional: Vec<String> = Vec::new();
    let mut exec_address = None;
    let mut config_file = None;
    let mut to_stdout = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-e" | "--exec" => {
                if i + 1 >= args.len() {
                    fail(program_name, "-e requires an exec address");
                }
                exec_address = Some(args[i + 1].clone());
                i += 2;
            }
            "-c" | "--config" => {
                if i + 1 >= args.len() {
                    fail(program_name, "--config requires a filename");
                }
                config_file = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--info" => {
                if i + 1 >= args.len() {
                    fail(program_name, "--info requires a .p file");
                }
                if let Err(err) = describe_tape(Path::new(&args[i + 1])) {
                    fail(program_name, &err.to_string());
                }
                return;
            }
            "--stdout" => {
                to_stdout = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(program_name);
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                fail(program_name, &format!("Unknown option '{}'", arg));
            }
            _ => {
                positional.push(args[i].clone());
                i += 1;
            }
        }
    }

    if positional.len() != 2 {
        fail(
            program_name,
            "Expected an input object file and an output name",
        );
    }
    let output_name = positional.pop().unwrap_or_default();
    let object_file = positional.pop().unwrap_or_default();

    let options = Options {
        object_file,
        output_name,
        exec_address,
        config_file,
        to_stdout,
        verbose,
    };

    if let Err(err) = run(&options) {
        fail(program_name, &err.to_string());
    }
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::discover(options.config_file.as_deref(), Path::new("."))?;

    // Validate everything before reading or writing any file
    let exec_address = match &options.exec_address {
        Some(text) => text.parse::<ExecAddress>()?,
        None => config.exec_address()?.unwrap_or_default(),
    };
    let name: TapeName = options.output_name.parse()?;

    if options.to_stdout && atty::is(atty::Stream::Stdout) {
        return Err("refusing to write a binary tape image to a terminal".into());
    }

    let payload = read_object_file(Path::new(&options.object_file))?;
    let converter = Zx81Converter::new(exec_address);
    let image = converter.convert(&payload, &name)?;

    if options.to_stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&image)?;
        handle.flush()?;
        return Ok(());
    }

    let output_path = config.output_path(&name.file_name());
    if options.verbose {
        println!(
            "Converting {} -> {} (exec address {})",
            options.object_file,
            output_path.display(),
            converter.exec_address()
        );
    }

    write_tape_file(&output_path, &image)?;

    if options.verbose {
        println!(
            "Wrote {} bytes ({} bytes of machine code) to {}",
            image.len(),
            payload.len(),
            output_path.display()
        );
    }
    Ok(())
}

fn describe_tape(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_object_file(path)?;
    let image = TapeImage::parse(&bytes)
        .map_err(|err| format!("{}: {}", path.display(), err))?;

    println!("Tape image:      {}", path.display());
    println!(
        "Name:            {}",
        image.tape_name().unwrap_or_else(|| "(unreadable)".to_string())
    );
    match image.exec_address() {
        Some(addr) => println!("Exec address:    {} ({:#06x})", addr, addr),
        None => println!("Exec address:    (unreadable)"),
    }
    println!("Machine code:    {} bytes", image.payload().len());
    println!("File size:       {} bytes", bytes.len());
    println!();
    println!("System variables:");
    print!("{}", image.system_vars);
    Ok(())
}

fn fail(program_name: &str, message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage(program_name);
    process::exit(1);
}

fn print_usage(program_name: &str) {
    eprintln!(
        "Usage: {} [options] <input object file> [-e <exec address>] <output name>",
        program_name
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --exec <addr>      Exec address (default: 16514)");
    eprintln!("  -c, --config <file>    Config file (default: ./obj2p.toml if present)");
    eprintln!("  --stdout               Write the image to stdout instead of <name>.p");
    eprintln!("  --info <file.p>        Describe an existing tape image");
    eprintln!("  -v, --verbose          Verbose output");
    eprintln!("  -h, --help             Show this help message");
    eprintln!();
    eprintln!("The exec address is where the code will start executing immediately");
    eprintln!("after loading. It must lie in the range 16383 to 32767.");
    eprintln!();
    eprintln!("The output name doesn't need the .p extension; it is added");
    eprintln!("automatically. The name can only use alphanumeric characters.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} game.bin GAME               # Write GAME.p", program_name);
    eprintln!("  {} game.bin -e 16600 GAME      # Start at 16600", program_name);
    eprintln!("  {} --info GAME.p               # Show the system variables", program_name);
}
