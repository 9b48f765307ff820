use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use skill_galaxy::catalog::Catalog;
use skill_galaxy::config::GalaxyConfig;
use skill_galaxy::render::orbit::ProfileTable;

mod app;

use app::GalaxyApp;

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "skill-galaxy", version, about = "Interactive 3D orbital skill galaxy")]
struct Args {
    /// Skill catalog (JSON). The built-in catalog is used when omitted.
    catalog: Option<PathBuf>,

    /// Camera, spin and style overrides (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Catalog from disk, or the built-in one when no path is given or it fails.
fn load_catalog(path: Option<&PathBuf>) -> (Catalog, ProfileTable) {
    let Some(path) = path else {
        return (Catalog::builtin(), ProfileTable::default());
    };
    match Catalog::load(path) {
        Ok((catalog, profiles)) => (catalog, profiles.unwrap_or_default()),
        Err(e) => {
            log::error!("{e}; using the built-in catalog");
            (Catalog::builtin(), ProfileTable::default())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> GalaxyConfig {
    match path.map(|p| GalaxyConfig::load(p)) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log::error!("{e}; using default configuration");
            GalaxyConfig::default()
        }
        None => GalaxyConfig::default(),
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let (catalog, profiles) = load_catalog(args.catalog.as_ref());
    let config = load_config(args.config.as_ref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Skill Galaxy"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Skill Galaxy",
        options,
        Box::new(move |cc| Ok(Box::new(GalaxyApp::new(cc, catalog, profiles, config)))),
    ) {
        log::error!("failed to start Skill Galaxy: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("skill-galaxy").chain(v.iter().copied()))
    }

    #[test]
    fn no_args_uses_builtin() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn catalog_and_config() {
        let a = args(&["skills.json", "--config", "cfg.json"]).unwrap();
        assert_eq!(a.catalog, Some(PathBuf::from("skills.json")));
        assert_eq!(a.config, Some(PathBuf::from("cfg.json")));

        let a = args(&["-c", "cfg.json"]).unwrap();
        assert_eq!(a.catalog, None);
        assert_eq!(a.config, Some(PathBuf::from("cfg.json")));
    }

    #[test]
    fn rejects_unknown_flag_and_extra_positional() {
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
        assert!(args(&["--config"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn unreadable_catalog_falls_back() {
        let (catalog, profiles) = load_catalog(Some(&PathBuf::from("/no/such/catalog.json")));
        assert_eq!(catalog.len(), Catalog::builtin().len());
        assert_eq!(profiles, ProfileTable::default());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("skill-galaxy-inverted-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"camera":{"min_distance":30.0}}"#).unwrap();
        let config = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);
        assert_eq!(config, GalaxyConfig::default());
    }
}
