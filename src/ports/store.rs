//! Store ports: user profiles and date-keyed daily logs.
//!
//! Both stores are simple key-value maps with no durability guarantee;
//! these traits abstract the backend from the application logic.

use chrono::NaiveDate;

use crate::domain::{Assessment, LoggedExercise, LoggedMeal, MealPlan, UserProfile};

/// Trait for per-user profile and latest-assessment storage.
pub trait ProfileStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a user's profile.
    ///
    /// # Returns
    /// `None` if the user has no stored profile.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, Self::Error>;

    /// Save (replace) a user's profile.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn save_profile(&self, user_id: &str, profile: UserProfile) -> Result<(), Self::Error>;

    /// Save a user's latest assessment, overwriting any previous one.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn save_assessment(&self, user_id: &str, assessment: Assessment) -> Result<(), Self::Error>;

    /// Fetch a user's latest assessment, if any.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn last_assessment(&self, user_id: &str) -> Result<Option<Assessment>, Self::Error>;

    /// Save a user's latest meal plan, overwriting any previous one.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn save_meal_plan(&self, user_id: &str, plan: MealPlan) -> Result<(), Self::Error>;

    /// Fetch a user's latest meal plan, if any.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn meal_plan(&self, user_id: &str) -> Result<Option<MealPlan>, Self::Error>;
}

/// Trait for append/list meal and exercise entries keyed by (user, date).
pub trait DailyLog: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append a meal entry.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn add_meal(&self, user_id: &str, entry: LoggedMeal) -> Result<(), Self::Error>;

    /// List the meals logged for one day.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn meals_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<LoggedMeal>, Self::Error>;

    /// Remove a logged meal by id. Returns whether anything was removed.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn remove_meal(
        &self,
        user_id: &str,
        date: NaiveDate,
        meal_id: u32,
    ) -> Result<bool, Self::Error>;

    /// Append an exercise entry.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn add_exercise(&self, user_id: &str, entry: LoggedExercise) -> Result<(), Self::Error>;

    /// List the exercises logged for one day.
    ///
    /// # Errors
    /// Returns error if the store operation fails.
    fn exercises_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<LoggedExercise>, Self::Error>;
}
