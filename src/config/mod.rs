use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

pub const DEFAULT_API_BASE: &str = "http://localhost:5001";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .codebenchrc if exists
        read_rc_file(&config_path, &mut map);

        // Overlay environment variables (take precedence); CODEBENCH_-prefixed wins
        let vars: Vec<(String, String)> = env::vars().collect();
        for (k, v) in vars.iter().filter(|(k, _)| is_config_key(k)) {
            map.insert(k.clone(), v.clone());
        }
        for (k, v) in &vars {
            if let Some(key) = k.strip_prefix("CODEBENCH_").filter(|key| is_config_key(key)) {
                map.insert(key.to_string(), v.clone());
            }
        }

        Self { inner: map, config_path }
    }

    /// Defaults overlaid with the given pairs; reads neither disk nor env.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Self { inner: map, config_path: default_config_path() }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn api_base(&self) -> String {
        self.get("API_BASE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("REQUEST_TIMEOUT").unwrap_or(60))
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("RUN_TIMEOUT").unwrap_or(30))
    }

    pub fn analysis_debounce(&self) -> Duration {
        Duration::from_millis(self.get_u64("ANALYSIS_DEBOUNCE_MS").unwrap_or(0))
    }

    pub fn cleanup_grace(&self) -> Duration {
        Duration::from_millis(self.get_u64("CLEANUP_GRACE_MS").unwrap_or(1000))
    }

    pub fn log_file(&self) -> PathBuf {
        self.get("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("codebench").join("codebench.log"))
    }
}

fn read_rc_file(path: &Path, map: &mut HashMap<String, String>) {
    if !path.exists() {
        return;
    }
    if let Ok(file) = fs::File::open(path) {
        let reader = BufReader::new(file);
        for line in reader.lines().map_while(Result::ok) {
            if let Some((k, v)) = parse_line(&line) {
                map.insert(k, v);
            }
        }
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    line.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "API_BASE",
        "REQUEST_TIMEOUT",
        "RUN_TIMEOUT",
        "ANALYSIS_DEBOUNCE_MS",
        "CLEANUP_GRACE_MS",
        "LOG_FILE",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("codebench").join(".codebenchrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("API_BASE".into(), DEFAULT_API_BASE.into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("RUN_TIMEOUT".into(), "30".into());
    m.insert("ANALYSIS_DEBOUNCE_MS".into(), "0".into());
    m.insert("CLEANUP_GRACE_MS".into(), "1000".into());
    m
}
