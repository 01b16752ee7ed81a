// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qal_semantics::{Analyzer, ErrorModelDescriptor, InstructionDescriptor};
use qal_source_file::parse_source_file;
use qal_syntax::visitor::NodeRef;

#[derive(Parser)]
#[command(name = "qaldemo")]
#[command(about = "Demo driver that parses QAL files and prints trees to stdout.")]
#[command(long_about = "
Demo driver that parses QAL files and prints trees to stdout.

`lex` prints the token stream, `parse` dumps the AST, `semantic` analyzes
the file against a small demo gate set and pretty-prints the semantic tree.
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex file to tokens
    Lex {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },

    /// Parse file and dump the AST
    Parse {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },

    /// Parse and analyze file, print the semantic tree
    Semantic {
        #[arg(value_name = "FILENAME")]
        file_name: PathBuf,
    },
}

/// A plausible gate set so the demo can analyze real-looking files.
fn demo_analyzer() -> Analyzer {
    let mut analyzer = Analyzer::new();
    for (name, params) in [
        ("i", "q"),
        ("h", "q"),
        ("x", "q"),
        ("y", "q"),
        ("z", "q"),
        ("rx", "qr"),
        ("ry", "qr"),
        ("rz", "qr"),
        ("cnot", "qq"),
        ("cz", "qq"),
        ("swap", "qq"),
        ("toffoli", "qqq"),
        ("prep_z", "q"),
        ("measure", "q"),
        ("u", "qu"),
    ] {
        analyzer.register_instruction(InstructionDescriptor::with_defaults(name, params).unwrap());
    }
    analyzer
        .register_instruction(InstructionDescriptor::new("measure_all", "", false, false, false).unwrap());
    analyzer.register_error_model(ErrorModelDescriptor::new("depolarizing_channel", "r").unwrap());
    analyzer
}

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Lex { file_name } => {
            let source = std::fs::read_to_string(file_name).expect("cannot read input file");
            for token in qal_lexer::tokenize(&source) {
                println!("{token:?}");
            }
        }

        Commands::Parse { file_name } => {
            let result = parse_source_file(file_name).expect("cannot read input file");
            result.print_errors();
            let mut out = String::new();
            qal_syntax::dump(NodeRef::from_root(result.root()), &mut out)
                .expect("dump cannot fail on a String");
            print!("{out}");
        }

        Commands::Semantic { file_name } => {
            let result = parse_source_file(file_name).expect("cannot read input file");
            if result.any_errors() {
                result.print_errors();
                std::process::exit(1);
            }
            let analysis = demo_analyzer().analyze(result.root());
            if analysis.any_errors() {
                for error in analysis.error_strings() {
                    eprintln!("{error}");
                }
                std::process::exit(1);
            }
            analysis.program().print_debug_pretty();
        }
    }
}
