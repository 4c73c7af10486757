use std::collections::BTreeMap;

use buildsettings::{Settings, SettingsLoader};

fn main() -> Result<(), buildsettings::Error> {
    let settings = SettingsLoader::builder()
        .with_file("demos/project.toml", true)
        .with_file("demos/local.toml", false)
        .build()?;

    let mut groups = BTreeMap::new();
    groups.insert(
        "Common".to_string(),
        Settings::from_toml_str("SWIFT_VERSION = \"5.0\"\nOTHER_SWIFT_FLAGS = [\"-enable-testing\"]")?,
    );

    println!("{settings}");

    for config in ["Debug", "Release"] {
        let resolved = settings.resolve(Some(config), &groups)?;
        println!("\n{config}:");
        for (key, value) in &resolved {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}
