// src/session/gamification.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{lesson::LessonKey, profile::UserProfile};

/// XP granted for every completed lesson.
pub const BASE_LESSON_XP: u32 = 100;
/// XP for a perfect quiz, scaled by accuracy.
pub const ACCURACY_BONUS_XP: f64 = 50.0;
pub const FAST_COMPLETION_XP: u32 = 30;
/// Growth of the XP threshold at each level-up.
pub const LEVEL_GROWTH: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    FirstStep,
    Diligent,
    Marathoner,
    Perfectionist,
    Router,
    DataArchitect,
    ApiMaestro,
    Optimizer,
    Polyglot,
}

impl BadgeId {
    pub fn name(&self) -> &'static str {
        match self {
            BadgeId::FirstStep => "First Step",
            BadgeId::Diligent => "Diligent",
            BadgeId::Marathoner => "Marathoner",
            BadgeId::Perfectionist => "Perfectionist",
            BadgeId::Router => "Router",
            BadgeId::DataArchitect => "Data Architect",
            BadgeId::ApiMaestro => "API Maestro",
            BadgeId::Optimizer => "Optimizer",
            BadgeId::Polyglot => "Polyglot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeId::FirstStep => "Complete your first lesson",
            BadgeId::Diligent => "Learn 7 days in a row",
            BadgeId::Marathoner => "Learn 30 days in a row",
            BadgeId::Perfectionist => "Finish a module with a perfect quiz",
            BadgeId::Router => "Master the routing system",
            BadgeId::DataArchitect => "Data fetching expertise",
            BadgeId::ApiMaestro => "Build advanced API routes",
            BadgeId::Optimizer => "Excellence in performance",
            BadgeId::Polyglot => "Ship internationalization",
        }
    }

    /// Badge awarded for completing a specific lesson.
    fn for_lesson(key: &LessonKey) -> Option<Self> {
        match (key.module.as_str(), key.lesson) {
            ("2", 2) => Some(BadgeId::Router),
            ("2", 4) => Some(BadgeId::DataArchitect),
            ("3", 1) => Some(BadgeId::ApiMaestro),
            ("4", 3) => Some(BadgeId::Optimizer),
            ("3", 4) => Some(BadgeId::Polyglot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInfo {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<BadgeId> for BadgeInfo {
    fn from(id: BadgeId) -> Self {
        Self {
            id,
            name: id.name(),
            description: id.description(),
        }
    }
}

/// Badges and streak bookkeeping, persisted next to the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    #[serde(default)]
    pub unlocked_badges: Vec<BadgeId>,
    #[serde(default)]
    pub last_activity: Option<NaiveDate>,
}

impl GamificationState {
    /// Unlocks a badge once. Returns whether it was new.
    fn unlock(&mut self, badge: BadgeId) -> bool {
        if self.unlocked_badges.contains(&badge) {
            return false;
        }
        self.unlocked_badges.push(badge);
        true
    }
}

/// How a lesson was completed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOutcome {
    /// Quiz accuracy in `[0, 1]`.
    pub accuracy: Option<f64>,
    pub fast_completion: bool,
}

/// What a learner gained by completing a lesson.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonReward {
    pub lesson: LessonKey,
    pub xp_earned: u32,
    pub level_up: bool,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub streak: u32,
    pub module_completed: bool,
    pub new_badges: Vec<BadgeInfo>,
}

pub fn lesson_xp(outcome: &CompletionOutcome) -> u32 {
    let accuracy_bonus = outcome
        .accuracy
        .map(|a| (a.clamp(0.0, 1.0) * ACCURACY_BONUS_XP).round() as u32)
        .unwrap_or(0);
    let speed_bonus = if outcome.fast_completion {
        FAST_COMPLETION_XP
    } else {
        0
    };

    BASE_LESSON_XP + accuracy_bonus + speed_bonus
}

/// Adds XP and applies every level-up it pays for. Returns the levels gained.
pub fn apply_xp(profile: &mut UserProfile, earned: u32) -> u32 {
    profile.xp = profile.xp.saturating_add(earned);

    let mut gained = 0;
    while profile.xp_to_next_level > 0 && profile.xp >= profile.xp_to_next_level {
        profile.xp -= profile.xp_to_next_level;
        profile.level += 1;
        profile.xp_to_next_level = (f64::from(profile.xp_to_next_level) * LEVEL_GROWTH).round() as u32;
        gained += 1;
    }
    gained
}

/// Updates the daily streak for an activity on `today`.
pub fn record_activity(profile: &mut UserProfile, state: &mut GamificationState, today: NaiveDate) {
    profile.streak = match state.last_activity {
        None => 1,
        Some(last) => match (today - last).num_days() {
            1 => profile.streak + 1,
            // Same day, or a clock that went backwards.
            d if d <= 0 => profile.streak.max(1),
            _ => 1,
        },
    };
    state.last_activity = Some(today);
}

/// Applies every gamification effect of completing `lesson`.
///
/// `module_completed` tells whether this completion finished the lesson's module.
pub fn reward_completion(
    profile: &mut UserProfile,
    state: &mut GamificationState,
    lesson: &LessonKey,
    outcome: &CompletionOutcome,
    module_completed: bool,
    today: NaiveDate,
) -> LessonReward {
    let xp_earned = lesson_xp(outcome);
    let levels = apply_xp(profile, xp_earned);

    record_activity(profile, state, today);
    profile.completed_lessons += 1;

    let mut candidates = Vec::new();
    if profile.completed_lessons == 1 {
        candidates.push(BadgeId::FirstStep);
    }
    if profile.streak >= 7 {
        candidates.push(BadgeId::Diligent);
    }
    if profile.streak >= 30 {
        candidates.push(BadgeId::Marathoner);
    }
    if module_completed && outcome.accuracy.is_some_and(|a| a >= 1.0) {
        candidates.push(BadgeId::Perfectionist);
    }
    candidates.extend(BadgeId::for_lesson(lesson));

    let new_badges: Vec<BadgeInfo> = candidates
        .into_iter()
        .filter(|badge| state.unlock(*badge))
        .map(BadgeInfo::from)
        .collect();

    profile.badges = state.unlocked_badges.len() as u32;

    LessonReward {
        lesson: lesson.clone(),
        xp_earned,
        level_up: levels > 0,
        level: profile.level,
        xp: profile.xp,
        xp_to_next_level: profile.xp_to_next_level,
        streak: profile.streak,
        module_completed,
        new_badges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Role;

    fn profile() -> UserProfile {
        UserProfile::new("p".into(), "Ada".into(), "ada@example.com".into(), Role::User)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn xp_includes_accuracy_and_speed_bonuses() {
        assert_eq!(lesson_xp(&CompletionOutcome::default()), 100);
        let outcome = CompletionOutcome {
            accuracy: Some(0.8),
            fast_completion: true,
        };
        assert_eq!(lesson_xp(&outcome), 170);
    }

    #[test]
    fn level_up_carries_remaining_xp_and_grows_threshold() {
        let mut p = profile();
        p.xp = 950;
        assert_eq!(apply_xp(&mut p, 100), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 50);
        assert_eq!(p.xp_to_next_level, 1500);
    }

    #[test]
    fn large_gains_cross_several_levels() {
        let mut p = profile();
        assert_eq!(apply_xp(&mut p, 2600), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 100);
        assert_eq!(p.xp_to_next_level, 2250);
    }

    #[test]
    fn streak_grows_on_consecutive_days_and_resets_after_a_gap() {
        let mut p = profile();
        let mut state = GamificationState::default();

        record_activity(&mut p, &mut state, day(1));
        assert_eq!(p.streak, 1);
        record_activity(&mut p, &mut state, day(1));
        assert_eq!(p.streak, 1);
        record_activity(&mut p, &mut state, day(2));
        assert_eq!(p.streak, 2);
        record_activity(&mut p, &mut state, day(5));
        assert_eq!(p.streak, 1);
        assert_eq!(state.last_activity, Some(day(5)));
    }

    #[test]
    fn first_completion_unlocks_first_step_once() {
        let mut p = profile();
        let mut state = GamificationState::default();
        let key: LessonKey = "1-1".parse().unwrap();

        let reward = reward_completion(&mut p, &mut state, &key, &Default::default(), false, day(1));
        assert_eq!(reward.xp_earned, 100);
        assert_eq!(reward.new_badges.len(), 1);
        assert_eq!(reward.new_badges[0].id, BadgeId::FirstStep);
        assert_eq!(p.badges, 1);
        assert_eq!(p.completed_lessons, 1);

        let other: LessonKey = "1-2".parse().unwrap();
        let reward = reward_completion(&mut p, &mut state, &other, &Default::default(), false, day(1));
        assert!(reward.new_badges.is_empty());
        assert_eq!(p.badges, 1);
    }

    #[test]
    fn topic_and_perfectionist_badges() {
        let mut p = profile();
        p.completed_lessons = 4;
        let mut state = GamificationState::default();
        let key: LessonKey = "2-2".parse().unwrap();
        let outcome = CompletionOutcome {
            accuracy: Some(1.0),
            fast_completion: false,
        };

        let reward = reward_completion(&mut p, &mut state, &key, &outcome, true, day(3));
        let ids: Vec<BadgeId> = reward.new_badges.iter().map(|b| b.id).collect();
        assert_eq!(ids, [BadgeId::Perfectionist, BadgeId::Router]);
        assert!(reward.module_completed);
        assert_eq!(reward.xp_earned, 150);
    }

    #[test]
    fn seven_day_streak_unlocks_diligent() {
        let mut p = profile();
        let mut state = GamificationState::default();
        let key: LessonKey = "5-1".parse().unwrap();

        let mut last = None;
        for d in 1..=7 {
            last = Some(reward_completion(&mut p, &mut state, &key, &Default::default(), false, day(d)));
        }
        let reward = last.unwrap();
        assert_eq!(reward.streak, 7);
        assert!(reward.new_badges.iter().any(|b| b.id == BadgeId::Diligent));
    }
}
