use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("  {}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    for (key, value, explicit) in entries(&config) {
        let marker = if explicit {
            String::new()
        } else {
            format!(" {}", "(default)".dimmed())
        };
        println!("  {} = {}{marker}", key.cyan(), value.green());
    }
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}

/// Effective settings as `(key, value, set_in_file)`.
fn entries(config: &Config) -> Vec<(&'static str, String, bool)> {
    let file = config.defaults.clone().unwrap_or_default();
    let options = config.viewer_options(None);
    vec![
        ("defaults.theme", config.theme(), file.theme.is_some()),
        (
            "defaults.slideshow_interval",
            options.slideshow_interval_secs.to_string(),
            file.slideshow_interval.is_some(),
        ),
        (
            "defaults.render_scale",
            options.render_scale.to_string(),
            file.render_scale.is_some(),
        ),
        (
            "defaults.start_fullscreen",
            config.start_fullscreen().to_string(),
            file.start_fullscreen.is_some(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_mark_defaults() {
        let mut config = Config::default();
        config.set("defaults.slideshow_interval", "10").unwrap();
        let entries = entries(&config);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], ("defaults.theme", "dark".to_string(), false));
        assert_eq!(
            entries[1],
            ("defaults.slideshow_interval", "10".to_string(), true)
        );
        assert_eq!(
            entries[3],
            ("defaults.start_fullscreen", "true".to_string(), false)
        );
    }
}
