//! Goal service

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{Goal, GoalId, Money, UserId};
use crate::storage::Storage;

use super::resolve_short;

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
    user_id: UserId,
}

/// Fields to change on a goal
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub deadline: Option<NaiveDate>,
    pub clear_deadline: bool,
}

fn positive(amount: Money, what: &str) -> FinsightResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(FinsightError::Validation(format!(
            "{} amount must be greater than zero (got {})",
            what, amount
        )))
    }
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self { storage, user_id }
    }

    pub fn create(&self, name: &str, target: Money, deadline: Option<NaiveDate>) -> FinsightResult<Goal> {
        let mut goal = Goal::new(self.user_id, name.trim(), target);
        goal.deadline = deadline;
        goal.validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        info!(id = %goal.id, name = %goal.name, target = %goal.target_amount, "goal created");
        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> FinsightResult<Option<Goal>> {
        self.storage.goals.get(self.user_id, id)
    }

    /// Find a goal by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> FinsightResult<Option<Goal>> {
        let goals = self.list()?;
        let wanted = identifier.trim().to_lowercase();
        if let Some(goal) = goals.iter().find(|g| g.name.to_lowercase() == wanted) {
            return Ok(Some(goal.clone()));
        }

        if let Ok(id) = identifier.trim().parse::<GoalId>() {
            return self.get(id);
        }

        resolve_short(goals, identifier, "Goal", |id, s| id.matches_short(s))
    }

    fn require(&self, identifier: &str) -> FinsightResult<Goal> {
        self.find(identifier)?
            .ok_or_else(|| FinsightError::goal_not_found(identifier))
    }

    /// Goals with a deadline first (soonest first), then by name
    pub fn list(&self) -> FinsightResult<Vec<Goal>> {
        self.storage.goals.get_for_user(self.user_id)
    }

    fn save_change(&self, before: &Goal, goal: &Goal) -> FinsightResult<()> {
        goal.validate()
            .map_err(|e| FinsightError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            before,
            goal,
        )
    }

    /// Move money toward a goal
    pub fn contribute(&self, identifier: &str, amount: Money) -> FinsightResult<Goal> {
        positive(amount, "Contribution")?;

        let mut goal = self.require(identifier)?;
        let before = goal.clone();
        goal.contribute(amount);
        self.save_change(&before, &goal)?;

        info!(id = %goal.id, amount = %amount, progress = goal.progress_percent(), "goal contribution");
        Ok(goal)
    }

    /// Take money out of a goal. The balance never drops below zero; the
    /// second value is what was actually withdrawn.
    pub fn withdraw(&self, identifier: &str, amount: Money) -> FinsightResult<(Goal, Money)> {
        positive(amount, "Withdrawal")?;

        let mut goal = self.require(identifier)?;
        let before = goal.clone();
        let taken = goal.withdraw(amount);
        self.save_change(&before, &goal)?;

        info!(id = %goal.id, requested = %amount, taken = %taken, "goal withdrawal");
        Ok((goal, taken))
    }

    pub fn update(&self, identifier: &str, changes: GoalUpdate) -> FinsightResult<Goal> {
        let mut goal = self.require(identifier)?;
        let before = goal.clone();

        if let Some(name) = changes.name {
            goal.name = name.trim().to_string();
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        if changes.clear_deadline {
            goal.deadline = None;
        } else if let Some(deadline) = changes.deadline {
            goal.deadline = Some(deadline);
        }

        goal.updated_at = Utc::now();
        self.save_change(&before, &goal)?;

        info!(id = %goal.id, "goal updated");
        Ok(goal)
    }

    pub fn delete(&self, identifier: &str) -> FinsightResult<Goal> {
        let goal = self.require(identifier)?;

        self.storage.goals.delete(self.user_id, goal.id)?;
        self.storage.goals.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;

        info!(id = %goal.id, "goal deleted");
        Ok(goal)
    }
}
