use std::sync::Arc;

use crate::calculate::PointsCalculator;
use crate::config::AppConfig;
use crate::storage::LeagueStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeagueStore>,
    pub config: Arc<AppConfig>,
    pub calculator: Arc<PointsCalculator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LeagueStore>,
        config: AppConfig,
        calculator: PointsCalculator,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            calculator: Arc::new(calculator),
        }
    }

    /// Weekly window from config, seven days if unparsable.
    pub fn weekly_window(&self) -> chrono::Duration {
        self.config
            .leaderboard
            .window()
            .unwrap_or_else(|| chrono::Duration::days(7))
    }
}
