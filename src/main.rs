//! LS-8 Emulator - CLI Entry Point
//!
//! Commands:
//! - `ls8-emu run <program>` - Run an .ls8 program image
//!
//! Program output (PRN) goes to stdout; everything else, including trace
//! lines and errors, goes to stderr, so stdout matches the program's
//! print stream byte for byte.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ls8-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the LS-8 8-bit educational computer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the .ls8 image to execute
        program: String,
        /// Maximum number of cycles to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_cycles: u64,
        /// Print a trace line to stderr before every cycle
        #[arg(short, long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            program,
            max_cycles,
            trace,
        }) => {
            run_program(&program, max_cycles, trace);
        }
        None => {
            println!("LS-8 Emulator v0.1.0");
            println!("An 8-bit educational computer emulator");
            println!();
            println!("Use --help for available commands");
            println!();
            print_opcode_table();
        }
    }
}

fn run_program(path: &str, max_cycles: u64, trace: bool) {
    use ls8::{load_image, Cpu};

    eprintln!("🔧 Running: {}", path);

    let program = match load_image(path) {
        Ok(bytes) => {
            eprintln!("📂 Loaded {} bytes", bytes.len());
            bytes
        }
        Err(e) => {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    if program.is_empty() {
        eprintln!("❌ No bytes to execute");
        std::process::exit(1);
    }

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&program) {
        eprintln!("❌ Failed to load program: {}", e);
        std::process::exit(1);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    while cpu.is_running() && cpu.cycles < max_cycles {
        if trace {
            eprintln!("{}", cpu.trace());
        }

        if let Err(e) = cpu.step(&mut out) {
            eprintln!("❌ CPU error at PC={:#04X}: {}", cpu.pc.value(), e);
            std::process::exit(1);
        }
    }

    eprintln!();
    eprintln!("━━━ Result ━━━");
    eprintln!("Cycles: {}", cpu.cycles);
    eprintln!("State: {:?}", cpu.state);

    if cpu.is_running() {
        eprintln!();
        eprintln!(
            "⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.",
            max_cycles
        );
    }
}

fn print_opcode_table() {
    use ls8::Opcode;

    println!("━━━ Opcode Table ━━━");
    println!();
    println!("  byte  mnemonic  operands");
    for op in Opcode::ALL {
        println!(
            "  0x{:02X}  {:<8}  {}",
            op.to_byte(),
            op.mnemonic(),
            op.operand_count()
        );
    }
}
