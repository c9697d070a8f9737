//! In-memory store adapters.
//!
//! Plain mutex-guarded maps, lifetime = process lifetime, nothing persisted
//! across restarts. Concurrent requests for different users never corrupt
//! each other; the mutex makes every write atomic.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::domain::{Assessment, LoggedExercise, LoggedMeal, MealPlan, UserProfile};
use crate::ports::{DailyLog, ProfileStore};

use super::StorageError;

/// In-memory implementation of [`ProfileStore`].
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
    assessments: Mutex<HashMap<String, Assessment>>,
    meal_plans: Mutex<HashMap<String, MealPlan>>,
}

impl InMemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    type Error = StorageError;

    fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, Self::Error> {
        let profiles = self.profiles.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(profiles.get(user_id).cloned())
    }

    fn save_profile(&self, user_id: &str, profile: UserProfile) -> Result<(), Self::Error> {
        let mut profiles = self.profiles.lock().map_err(|_| StorageError::Poisoned)?;
        profiles.insert(user_id.to_string(), profile);
        Ok(())
    }

    fn save_assessment(&self, user_id: &str, assessment: Assessment) -> Result<(), Self::Error> {
        let mut assessments = self
            .assessments
            .lock()
            .map_err(|_| StorageError::Poisoned)?;
        assessments.insert(user_id.to_string(), assessment);
        Ok(())
    }

    fn last_assessment(&self, user_id: &str) -> Result<Option<Assessment>, Self::Error> {
        let assessments = self
            .assessments
            .lock()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(assessments.get(user_id).cloned())
    }

    fn save_meal_plan(&self, user_id: &str, plan: MealPlan) -> Result<(), Self::Error> {
        let mut plans = self.meal_plans.lock().map_err(|_| StorageError::Poisoned)?;
        plans.insert(user_id.to_string(), plan);
        Ok(())
    }

    fn meal_plan(&self, user_id: &str) -> Result<Option<MealPlan>, Self::Error> {
        let plans = self.meal_plans.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(plans.get(user_id).cloned())
    }
}

/// In-memory implementation of [`DailyLog`].
#[derive(Debug, Default)]
pub struct InMemoryDailyLog {
    meals: Mutex<HashMap<(String, NaiveDate), Vec<LoggedMeal>>>,
    exercises: Mutex<HashMap<(String, NaiveDate), Vec<LoggedExercise>>>,
}

impl InMemoryDailyLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DailyLog for InMemoryDailyLog {
    type Error = StorageError;

    fn add_meal(&self, user_id: &str, entry: LoggedMeal) -> Result<(), Self::Error> {
        let mut meals = self.meals.lock().map_err(|_| StorageError::Poisoned)?;
        meals
            .entry((user_id.to_string(), entry.date))
            .or_default()
            .push(entry);
        Ok(())
    }

    fn meals_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<LoggedMeal>, Self::Error> {
        let meals = self.meals.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(meals
            .get(&(user_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    fn remove_meal(
        &self,
        user_id: &str,
        date: NaiveDate,
        meal_id: u32,
    ) -> Result<bool, Self::Error> {
        let mut meals = self.meals.lock().map_err(|_| StorageError::Poisoned)?;
        let Some(entries) = meals.get_mut(&(user_id.to_string(), date)) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|entry| entry.meal.id != meal_id);
        Ok(entries.len() < before)
    }

    fn add_exercise(&self, user_id: &str, entry: LoggedExercise) -> Result<(), Self::Error> {
        let mut exercises = self.exercises.lock().map_err(|_| StorageError::Poisoned)?;
        exercises
            .entry((user_id.to_string(), entry.date))
            .or_default()
            .push(entry);
        Ok(())
    }

    fn exercises_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<LoggedExercise>, Self::Error> {
        let exercises = self.exercises.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(exercises
            .get(&(user_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }
}
