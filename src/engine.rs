use std::sync::Arc;

use crate::config::TrainerConfig;
use crate::error::GtoResult;
use crate::preflop::PreflopCharts;
use crate::strategy::StrategyTable;

/// Everything the trainer reads but never mutates: configuration, preflop
/// charts and the postflop strategy table. Built once at startup and shared
/// between sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Engine {
    pub config: TrainerConfig,
    pub charts: PreflopCharts,
    pub strategy: StrategyTable,
}

impl Engine {
    /// Embedded charts, plus the strategy document named in `config` when
    /// it loads (defaults otherwise).
    pub fn new(config: TrainerConfig) -> GtoResult<Self> {
        let charts = PreflopCharts::embedded()?;
        let strategy = StrategyTable::load_or_default(config.strategy_path.as_deref());
        Ok(Engine {
            config,
            charts,
            strategy,
        })
    }

    pub fn with_strategy(config: TrainerConfig, strategy: StrategyTable) -> GtoResult<Self> {
        Ok(Engine {
            config,
            charts: PreflopCharts::embedded()?,
            strategy,
        })
    }

    /// Default configuration and default strategies.
    pub fn standard() -> GtoResult<Arc<Self>> {
        Ok(Arc::new(Self::with_strategy(
            TrainerConfig::default(),
            StrategyTable::with_defaults(),
        )?))
    }
}
