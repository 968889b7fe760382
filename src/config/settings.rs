#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starter_rating: i32,
    /// Club season opening, used to stamp the initial history entry.
    pub season_start_month: u32,
    pub season_start_day: u32,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starter_rating: 1500,
            season_start_month: 10,
            season_start_day: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
        }
    }
}

// Passed explicitly (dependency injection) rather than held in a global.
