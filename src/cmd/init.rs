use anyhow::Result;
use std::io::{self, Write};

use pillbox::db::Database;
use pillbox::models::config::Config;

pub fn run(skip: bool) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    if !skip {
        println!("Pillbox — Initial Setup\n");

        let user = prompt_string("User id (empty keeps 'local')")?;
        if !user.is_empty() {
            config.profile.user = user;
        }
        let weekday = prompt_string("Weekly report weekday, 0=Mon..6=Sun (empty keeps Sunday)")?;
        if let Ok(d) = weekday.parse::<u8>()
            && d <= 6
        {
            config.schedule.weekly_weekday = d;
        }

        config.save()?;
        Database::open(&Config::db_path())?;

        println!("\nSetup complete. Data stored in {:?}", Config::data_dir());
    } else {
        config.save()?;
        Database::open(&Config::db_path())?;
        println!("Config initialized with defaults at {:?}", Config::path());
    }

    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}
