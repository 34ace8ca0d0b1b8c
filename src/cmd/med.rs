use anyhow::Result;
use serde_json::json;

use pillbox::db::Database;
use pillbox::models::config::Config;
use pillbox::models::medicine::Medicine;
use pillbox::output;

use super::resolve_user;

pub fn run_add(name: &str, note: Option<&str>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let mut med = Medicine::new(&user, name);
    if let Some(n) = note {
        med.notes = Some(n.to_string());
    }
    db.insert_medicine(&med)?;

    if human {
        println!("Added medicine {} ({})", med.name, med.id);
    } else {
        let out = output::success("med_add", json!(med));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let meds = db.list_medicines(&user)?;

    if human {
        println!("{}", output::human::format_medicines(&meds));
    } else {
        let out = output::success("med_list", json!({ "medicines": meds }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
