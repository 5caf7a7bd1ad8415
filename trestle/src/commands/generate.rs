use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use trestle_codegen::{Generator, Options};

use crate::input::load_design;

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to the design document (.json or .toml)
    #[arg(short, long)]
    pub design: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "gen")]
    pub out: PathBuf,

    /// Name of the generated package
    #[arg(short, long, default_value = "app")]
    pub package: String,

    /// Skip test helper generation
    #[arg(long)]
    pub notest: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let api = load_design(&self.design)?;

        let linked = match trestle_design::link(&api) {
            Ok(linked) => linked,
            Err(errors) => {
                eprintln!("{:?}", miette::Report::new(errors));
                std::process::exit(1);
            }
        };

        let options = Options {
            package: self.package.clone(),
            notest: self.notest,
            design_source: Some(self.design.display().to_string()),
        };
        let generator = Generator::new(&self.out, options);

        match generator.generate(&linked) {
            Ok(files) => {
                println!("{}", linked.context());
                println!();
                println!("Generated ({} files):", files.len().saturating_sub(1));
                for file in files.iter().skip(1) {
                    println!("  {}", file.display());
                }
                Ok(())
            }
            Err(err) => {
                eprintln!("error: failed to generate from '{}'", self.design.display());
                eprintln!("{:?}", miette::Report::new(err));
                std::process::exit(1);
            }
        }
    }
}
