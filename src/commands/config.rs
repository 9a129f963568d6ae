use anyhow::{Context, Result};
use colored::Colorize;

use crate::{
    cli::ConfigCmd,
    notify,
    types::{ALLOWED_CONFIG_KEYS, Config, best_key_suggestion, canonical_config_key},
};

/// Value-level checks for the keys that have a shape. `bodyweight` is a
/// positive number of pounds, `unit` is `lb` or `kg`.
fn validate_value(key: &str, val: &str) -> Result<(), String> {
    match key {
        "bodyweight" => match val.parse::<f64>() {
            Ok(v) if v > 0.0 => Ok(()),
            _ => Err(format!("`{}` is not a positive number", val)),
        },
        "unit" => {
            if val == "lb" || val == "kg" {
                Ok(())
            } else {
                Err(format!("`{}` is not a unit (expected `lb` or `kg`)", val))
            }
        }
        _ => Ok(()),
    }
}

pub async fn handle(cmd: ConfigCmd) -> Result<()> {
    let config_path = dirs::config_dir()
        .map(|d| d.join("liftlog").join("config.toml"))
        .context("Could not determine config directory")?;
    let mut cfg = Config::load(&config_path)?;

    match cmd {
        ConfigCmd::List => {
            if cfg.map.is_empty() {
                println!("{}", "(no config set)".dimmed());
            } else {
                println!("{}", "Config:".cyan().bold());
                for (k, v) in &cfg.map {
                    println!("  {} = {}", k.green(), v);
                }
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None => notify::warning(&format!("key `{}` not found", key)),
        },

        ConfigCmd::Set { key, val } => {
            let key = match canonical_config_key(&key) {
                Some(k) => k,
                None => {
                    if let Some(suggestion) = best_key_suggestion(&key) {
                        notify::warning(&format!(
                            "unknown key `{}` -- did you mean: `{}`?",
                            key,
                            suggestion.green()
                        ));
                    } else {
                        let allowed = ALLOWED_CONFIG_KEYS
                            .iter()
                            .copied()
                            .collect::<Vec<_>>()
                            .join(", ");
                        notify::warning(&format!(
                            "unknown key `{}` (allowed: {})",
                            key, allowed
                        ));
                    }
                    return Ok(());
                }
            };

            if let Err(msg) = validate_value(&key, &val) {
                notify::error(&msg);
                return Ok(());
            }

            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&config_path)?;
            notify::info(&format!("set `{}` = `{}`", key.green(), val));
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(&config_path)?;
                notify::info(&format!("removed `{}`", key.green()));
            } else {
                notify::warning(&format!("key `{}` not found", key));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodyweight_must_be_a_positive_number() {
        assert!(validate_value("bodyweight", "185.5").is_ok());
        assert!(validate_value("bodyweight", "0").is_err());
        assert!(validate_value("bodyweight", "-5").is_err());
        assert!(validate_value("bodyweight", "heavy").is_err());
    }

    #[test]
    fn unit_is_lb_or_kg() {
        assert!(validate_value("unit", "lb").is_ok());
        assert!(validate_value("unit", "kg").is_ok());
        assert!(validate_value("unit", "stone").is_err());
    }
}
