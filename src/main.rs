use clap::Parser;
use isolate_tree_tools::{cli, commands};

fn main() {
    let args = cli::Args::parse();

    let result = commands::annotate::run(args.filename, args.tree, args.output);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
