use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use crate::input::load_design;

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the design document (.json or .toml)
    #[arg(short, long)]
    pub design: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let api = load_design(&self.design)?;

        match trestle_design::link(&api) {
            Ok(linked) => {
                println!("{} is valid", linked.context());
                println!(
                    "  {} resource(s), {} media type(s), {} user type(s), {} security scheme(s)",
                    linked.resources.len(),
                    linked.media_types.len(),
                    linked.user_types.len(),
                    linked.security_schemes.len()
                );
                Ok(())
            }
            Err(errors) => {
                eprintln!("{:?}", miette::Report::new(errors));
                std::process::exit(1);
            }
        }
    }
}
