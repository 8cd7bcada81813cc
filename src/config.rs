use std::env;

/// Deployment configuration, loaded once at startup and shared by every
/// handler. Secrets come from the environment; repository coordinates and
/// document paths have the deployment's defaults.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub github_token: String,
    pub admin_key: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub repo_branch: String,
    pub players_path: String,
    pub leaderboard_path: String,
    pub game_results_path: String,
    pub registration_hook_url: Option<String>,
    pub admin_hook_url: Option<String>,
    pub game_hook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: or_default("HOST", "0.0.0.0"),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            github_token: required("GITHUB_TOKEN"),
            admin_key: required("ADMIN_KEY"),
            repo_owner: required("REPO_OWNER"),
            repo_name: required("REPO_NAME"),
            repo_branch: or_default("REPO_BRANCH", "main"),
            players_path: or_default("PLAYERS_PATH", "data/players.json"),
            leaderboard_path: or_default("LEADERBOARD_PATH", "data/leaderboard.json"),
            game_results_path: or_default("GAME_RESULTS_PATH", "data/game_results.json"),
            registration_hook_url: hook("REGISTRATION_HOOK_URL"),
            admin_hook_url: hook("ADMIN_HOOK_URL"),
            game_hook_url: hook("GAME_HOOK_URL"),
        }
    }
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn hook(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            tracing::warn!("{key} not set, rebuild notifications for it are disabled");
            None
        }
    }
}
