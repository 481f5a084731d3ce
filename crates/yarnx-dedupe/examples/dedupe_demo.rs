use yarnx_dedupe::{
    fix_duplicates, list_duplicates, resolve_lockfile, DedupeOptions, Lockfile, Strategy,
};

const LOCKFILE: &str = r#"{
    "__metadata": { "version": 6, "cacheKey": 8 },
    "library@npm:>=1.0.0": { "version": "3.0.0", "resolution": "library@npm:3.0.0" },
    "library@npm:>=1.1.0": { "version": "3.0.0", "resolution": "library@npm:3.0.0" },
    "library@npm:^2.0.0": { "version": "2.1.0", "resolution": "library@npm:2.1.0" },
    "sinon@npm:next": { "version": "10.0.0-rc.1", "resolution": "sinon@npm:10.0.0-rc.1" },
    "sinon@npm:^9.0.0": { "version": "9.2.4", "resolution": "sinon@npm:9.2.4" },
    "my-app@workspace:.": { "version": "0.0.0-use.local", "linkType": "soft" }
}"#;

fn main() -> yarnx_dedupe::Result<()> {
    println!("Lockfile Deduplication Demo\n");

    let lockfile = Lockfile::from_json(LOCKFILE)?;
    println!("Loaded {} entries", lockfile.len());
    println!();

    for strategy in Strategy::ALL {
        let options = DedupeOptions::new().strategy(strategy);

        println!("Strategy: {}", strategy);
        let duplicates = list_duplicates(&lockfile, &options)?;
        if duplicates.is_empty() {
            println!("   No duplicates");
        }
        for duplicate in &duplicates {
            println!("   {}", duplicate);
        }
        println!();
    }

    // Candidate ranking for the default strategy
    println!("Candidates (fewerHighest):");
    let resolution = resolve_lockfile(&lockfile, &DedupeOptions::default())?;
    for instance in resolution.instances() {
        println!(
            "   {} -> {} (candidates: {:?}, ignored: {})",
            instance.descriptor_string,
            instance.best_version,
            instance.candidate_versions.as_deref().unwrap_or_default(),
            instance.ignored
        );
    }
    println!();

    let options = DedupeOptions::new().strategy(Strategy::MostCommon);
    let fixed = fix_duplicates(&lockfile, &options)?;
    println!("Deduplicated lockfile (mostCommon):");
    println!("{}", fixed.to_json()?);

    Ok(())
}
