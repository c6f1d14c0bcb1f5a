use clap::Args;
use std::io::{self, Write};

use foodcost_core::DemoStore;

#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long, short)]
    force: bool,
}

impl ResetArgs {
    pub fn run(&self, store: &mut DemoStore) -> Result<(), Box<dyn std::error::Error>> {
        // Confirm reset unless --force is used
        if !self.force {
            print!("Discard all changes and restore the demo data? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Reset cancelled.");
                return Ok(());
            }
        }

        store.reset();
        println!("Demo data restored ({} record(s))", store.snapshot().len());
        Ok(())
    }
}
