//! Full data reset: wipe every entity table and the preference file.

use bizplanner_core::storage::PlannerDb;
use bizplanner_core::Prefs;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("refusing to wipe all data; pass --yes to confirm".into());
    }

    let db = PlannerDb::open()?;
    let summary = db.reset_all()?;

    let mut prefs = Prefs::load_or_default();
    prefs.reset();
    prefs.save()?;

    println!("All data deleted:");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
