use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use flashdeck_lib::flashcards::{CategoryFilter, StudyMode, StudySession, Unit, UnitRegistry};
use flashdeck_lib::{now_millis, Config, FileStore};

/// Command-line overrides applied on top of the config file
pub struct AppOptions {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub unit: Option<String>,
    pub filter: Option<CategoryFilter>,
    pub mode: StudyMode,
}

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub data_dir: PathBuf,
    pub session: StudySession<FileStore>,
}

impl App {
    /// Load config, open the data directory and start a session
    pub fn new(options: AppOptions) -> Result<Self> {
        let config = Config::load(options.config_path.as_deref())
            .context("Failed to load config")?;

        let data_dir = match options.data_dir {
            Some(dir) => dir,
            None => config.resolved_data_dir().context("Failed to get data directory")?,
        };
        let store = FileStore::new(data_dir.clone())
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

        let mut session_options = config
            .session_options(options.mode)
            .context("Invalid config")?;
        if let Some(filter) = options.filter {
            session_options.filter = filter;
        }

        let session = StudySession::open(UnitRegistry::new(store), session_options, now_millis())
            .context("Failed to open units")?;

        let mut app = Self {
            config,
            data_dir,
            session,
        };

        if let Some(query) = options.unit.as_deref() {
            let unit = app.find_unit(query)?;
            app.session
                .switch_unit(&unit.id, now_millis())
                .with_context(|| format!("Failed to load unit '{}'", unit.name))?;
        }

        Ok(app)
    }

    /// List all units
    pub fn list_units(&self) -> Result<Vec<Unit>> {
        self.session.units().context("Failed to list units")
    }

    /// Find a unit by id, then by name (case-insensitive prefix match)
    pub fn find_unit(&self, query: &str) -> Result<Unit> {
        let units = self.list_units()?;
        let query_lower = query.to_lowercase();

        // Exact match first
        if let Some(unit) = units
            .iter()
            .find(|u| u.id == query || u.name.to_lowercase() == query_lower)
        {
            return Ok(unit.clone());
        }

        // Prefix match
        let matches: Vec<&Unit> = units
            .iter()
            .filter(|u| u.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No unit matching '{}'. Available units:\n{}", query,
                units.iter().map(|u| format!("  - {} ({})", u.name, u.id)).collect::<Vec<_>>().join("\n")),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous unit name '{}'. Matches:\n{}", query,
                matches.iter().map(|u| format!("  - {} ({})", u.name, u.id)).collect::<Vec<_>>().join("\n")),
        }
    }

    /// Registry record of the active unit
    pub fn active_unit(&self) -> Result<Option<Unit>> {
        let Some(id) = self.session.active_unit() else {
            return Ok(None);
        };
        Ok(self.list_units()?.into_iter().find(|u| u.id == id))
    }

    /// Active unit or an error explaining that none is loaded
    pub fn require_active_unit(&self) -> Result<Unit> {
        match self.active_unit()? {
            Some(unit) => Ok(unit),
            None => bail!("No unit loaded. Use `flashdeck-cli units` to list available units."),
        }
    }
}

#[cfg(test)]
impl App {
    /// Session over a single unit "Test Unit" stored in `dir`
    pub fn for_test(dir: &tempfile::TempDir, cards: Vec<flashdeck_lib::Card>, mode: StudyMode) -> Self {
        use flashdeck_lib::flashcards::{PreloadedUnit, SessionOptions};

        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let registry = UnitRegistry::with_preloads(store, vec![PreloadedUnit::new("unit_test", "Test Unit", cards)]);
        let options = SessionOptions {
            default_unit: Some("unit_test".to_string()),
            mode,
            ..Default::default()
        };

        Self {
            config: Config::default(),
            data_dir: dir.path().to_path_buf(),
            session: StudySession::open(registry, options, now_millis()).unwrap(),
        }
    }
}
