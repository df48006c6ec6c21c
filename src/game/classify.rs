//! Pure labelling of a new event against the state immediately preceding it.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::event::{GoalEvent, PenaltyEvent, ValidationError, MAX_PENALTY_MINUTES};

/// Penalty labels that mark a major (five minute / fighting) infraction
pub const MAJOR_VOCABULARY: &[&str] = &["major", "fighting", "fight", "match"];

/// Penalty labels that mark a misconduct
pub const MISCONDUCT_VOCABULARY: &[&str] = &["misconduct"];

/// Minutes beyond which a non-major penalty counts as a double minor
pub const MINOR_PENALTY_MINUTES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GoalContext {
    FirstGoalOfGame,
    TyingGoal,
    GoAheadGoal,
    InsuranceGoal,
    RegularGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PenaltyContext {
    FirstPenaltyOfGame,
    MajorPenalty,
    MisconductPenalty,
    DoubleMinor,
    RegularPenalty,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrengthSituation {
    #[default]
    EvenStrength,
    PowerPlay,
    ShortHanded,
    #[serde(rename = "5-on-3-or-worse")]
    #[strum(to_string = "5-on-3-or-worse")]
    FiveOnThreeOrWorse,
}

/// Strength situation between the two sides, with the side holding the advantage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrengthSnapshot {
    pub situation: StrengthSituation,
    pub advantaged_team: Option<String>,
}

impl StrengthSnapshot {
    pub fn even() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalClassification {
    pub first_of_game: bool,
    /// Lead-change context from the score before the goal
    pub context: GoalContext,
    /// Strength from the scoring team's point of view
    pub strength: StrengthSituation,
}

impl GoalClassification {
    /// The single label chosen by the priority list, first match wins
    pub fn primary_label(&self) -> GoalContext {
        if self.first_of_game {
            GoalContext::FirstGoalOfGame
        } else {
            self.context
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyClassification {
    pub first_of_game: bool,
    /// Severity context from the penalty's label and duration
    pub context: PenaltyContext,
    /// Strength once this penalty is on the clock
    pub strength_after: StrengthSnapshot,
}

impl PenaltyClassification {
    pub fn primary_label(&self) -> PenaltyContext {
        if self.first_of_game {
            PenaltyContext::FirstPenaltyOfGame
        } else {
            self.context
        }
    }
}

/// Lead-change context of a goal from the score before it.
///
/// The opening goal of a game is not a lead change, so its context stays
/// `RegularGoal`; [`GoalClassification::primary_label`] reports it as the
/// first goal instead.
pub fn goal_context(team_before: u32, opponent_before: u32, first_of_game: bool) -> GoalContext {
    if first_of_game {
        return GoalContext::RegularGoal;
    }

    let team_after = team_before + 1;
    if team_before < opponent_before && team_after == opponent_before {
        GoalContext::TyingGoal
    } else if team_before <= opponent_before && team_after > opponent_before {
        GoalContext::GoAheadGoal
    } else if team_before > opponent_before {
        GoalContext::InsuranceGoal
    } else {
        GoalContext::RegularGoal
    }
}

/// Strength at the time of a goal from active penalty counts
pub fn goal_strength(scoring_active: usize, opponent_active: usize) -> StrengthSituation {
    match scoring_active.cmp(&opponent_active) {
        std::cmp::Ordering::Equal => StrengthSituation::EvenStrength,
        std::cmp::Ordering::Less => StrengthSituation::PowerPlay,
        std::cmp::Ordering::Greater => StrengthSituation::ShortHanded,
    }
}

fn matches_vocabulary(label: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|word| label.contains(word))
}

/// Severity context of a penalty from its label and duration
pub fn penalty_context(penalty_type: &str, duration_minutes: u32) -> PenaltyContext {
    let label = penalty_type.to_ascii_lowercase();
    if matches_vocabulary(&label, MAJOR_VOCABULARY) {
        PenaltyContext::MajorPenalty
    } else if matches_vocabulary(&label, MISCONDUCT_VOCABULARY) {
        PenaltyContext::MisconductPenalty
    } else if duration_minutes > MINOR_PENALTY_MINUTES {
        PenaltyContext::DoubleMinor
    } else {
        PenaltyContext::RegularPenalty
    }
}

/// Strength between two sides given their active penalty counts.
///
/// The side serving fewer penalties holds the advantage; a gap of two or more
/// is a 5-on-3 or worse.
pub fn strength_between(
    first: &str,
    first_active: usize,
    second: Option<&str>,
    second_active: usize,
) -> StrengthSnapshot {
    let gap = first_active.abs_diff(second_active);
    if gap == 0 {
        return StrengthSnapshot::even();
    }

    let advantaged_team = if first_active < second_active {
        Some(first.to_string())
    } else {
        second.map(str::to_string)
    };
    let situation = if gap >= 2 {
        StrengthSituation::FiveOnThreeOrWorse
    } else {
        StrengthSituation::PowerPlay
    };

    StrengthSnapshot {
        situation,
        advantaged_team,
    }
}

/// Fields of a goal that classification depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidGoal<'a> {
    pub team: &'a str,
    pub scorer: &'a str,
    pub game_time: u32,
}

/// Fields of a penalty that classification depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPenalty<'a> {
    pub team: &'a str,
    pub player: &'a str,
    pub penalty_type: &'a str,
    pub duration_minutes: u32,
    pub game_time: u32,
}

fn first_defect(defects: &[ValidationError]) -> Result<(), ValidationError> {
    match defects.first() {
        Some(defect) => Err(defect.clone()),
        None => Ok(()),
    }
}

pub fn validate_goal(goal: &GoalEvent) -> Result<ValidGoal<'_>, ValidationError> {
    let header = &goal.header;
    first_defect(&header.defects)?;

    let team = header.team();
    if team.is_empty() {
        return Err(ValidationError::missing("team"));
    }

    Ok(ValidGoal {
        team,
        scorer: header.player()?,
        game_time: header.game_time()?,
    })
}

pub fn validate_penalty(penalty: &PenaltyEvent) -> Result<ValidPenalty<'_>, ValidationError> {
    let header = &penalty.header;
    first_defect(&header.defects)?;

    let team = header.team();
    if team.is_empty() {
        return Err(ValidationError::missing("team"));
    }

    let penalty_type = penalty
        .penalty_type
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .ok_or_else(|| ValidationError::missing("penalty_type"))?;

    let duration_minutes = match penalty.duration_minutes {
        Some(minutes) if (1..=MAX_PENALTY_MINUTES).contains(&minutes) => minutes,
        Some(minutes) => return Err(ValidationError::InvalidDuration(minutes.to_string())),
        None => return Err(ValidationError::missing("duration_minutes")),
    };

    Ok(ValidPenalty {
        team,
        player: header.player()?,
        penalty_type,
        duration_minutes,
        game_time: header.game_time()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventHeader, GameClock, GoalType, Period};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(0, 1, GoalContext::TyingGoal)]
    #[case(1, 1, GoalContext::GoAheadGoal)]
    #[case(2, 3, GoalContext::TyingGoal)]
    #[case(0, 2, GoalContext::RegularGoal)]
    #[case(2, 1, GoalContext::InsuranceGoal)]
    #[case(4, 0, GoalContext::InsuranceGoal)]
    fn lead_change_context(
        #[case] team_before: u32,
        #[case] opponent_before: u32,
        #[case] expected: GoalContext,
    ) {
        assert_eq!(goal_context(team_before, opponent_before, false), expected);
    }

    #[test]
    fn opening_goal_is_first_goal_and_regular() {
        let classification = GoalClassification {
            first_of_game: true,
            context: goal_context(0, 0, true),
            strength: StrengthSituation::EvenStrength,
        };
        assert_eq!(classification.primary_label(), GoalContext::FirstGoalOfGame);
        assert_eq!(classification.context, GoalContext::RegularGoal);
    }

    #[rstest]
    #[case(0, 0, StrengthSituation::EvenStrength)]
    #[case(0, 1, StrengthSituation::PowerPlay)]
    #[case(1, 0, StrengthSituation::ShortHanded)]
    #[case(1, 2, StrengthSituation::PowerPlay)]
    fn strength_at_goal(
        #[case] scoring_active: usize,
        #[case] opponent_active: usize,
        #[case] expected: StrengthSituation,
    ) {
        assert_eq!(goal_strength(scoring_active, opponent_active), expected);
    }

    #[rstest]
    #[case("Fighting", 5, PenaltyContext::MajorPenalty)]
    #[case("Major - Boarding", 5, PenaltyContext::MajorPenalty)]
    #[case("Game Misconduct", 10, PenaltyContext::MisconductPenalty)]
    #[case("High-sticking", 4, PenaltyContext::DoubleMinor)]
    #[case("Tripping", 2, PenaltyContext::RegularPenalty)]
    fn penalty_severity(
        #[case] label: &str,
        #[case] minutes: u32,
        #[case] expected: PenaltyContext,
    ) {
        assert_eq!(penalty_context(label, minutes), expected);
    }

    #[test]
    fn strength_between_sides() {
        assert_eq!(strength_between("A", 1, Some("B"), 1), StrengthSnapshot::even());

        let power_play = strength_between("A", 1, Some("B"), 0);
        assert_eq!(power_play.situation, StrengthSituation::PowerPlay);
        assert_eq!(power_play.advantaged_team.as_deref(), Some("B"));

        let two_man = strength_between("A", 0, Some("B"), 2);
        assert_eq!(two_man.situation, StrengthSituation::FiveOnThreeOrWorse);
        assert_eq!(two_man.advantaged_team.as_deref(), Some("A"));

        let unknown_opponent = strength_between("A", 1, None, 0);
        assert_eq!(unknown_opponent.situation, StrengthSituation::PowerPlay);
        assert_eq!(unknown_opponent.advantaged_team, None);
    }

    #[test]
    fn labels_render_in_kebab_case() {
        assert_eq!(GoalContext::GoAheadGoal.to_string(), "go-ahead-goal");
        assert_eq!(PenaltyContext::DoubleMinor.to_string(), "double-minor");
        assert_eq!(
            StrengthSituation::FiveOnThreeOrWorse.to_string(),
            "5-on-3-or-worse"
        );
        assert_eq!(
            serde_json::to_value(StrengthSituation::FiveOnThreeOrWorse).unwrap(),
            "5-on-3-or-worse"
        );
    }

    fn header() -> EventHeader {
        EventHeader {
            id: Uuid::new_v4(),
            game_id: "g1".into(),
            team: "Blades".into(),
            player: Some("Adams".into()),
            period: Some(Period::Regulation(1)),
            clock: Some(GameClock::parse("15:00").unwrap()),
            recorded_at: Utc::now(),
            defects: vec![],
        }
    }

    #[test]
    fn goal_validation_requires_scorer_and_clock() {
        let mut goal = GoalEvent {
            header: header(),
            assists: vec![],
            goal_type: GoalType::EvenStrength,
        };
        let valid = validate_goal(&goal).unwrap();
        assert_eq!(valid.game_time, 300);

        goal.header.player = Some("  ".into());
        assert_eq!(
            validate_goal(&goal),
            Err(ValidationError::MissingField("player".into()))
        );

        goal.header.player = Some("Adams".into());
        goal.header.clock = None;
        assert_eq!(
            validate_goal(&goal),
            Err(ValidationError::MissingField("clock".into()))
        );
    }

    #[test]
    fn penalty_validation_surfaces_normalization_defects() {
        let mut penalty = PenaltyEvent {
            header: header(),
            penalty_type: Some("Tripping".into()),
            duration_minutes: Some(2),
        };
        assert!(validate_penalty(&penalty).is_ok());

        penalty.header.defects = vec![ValidationError::InvalidDuration("two".into())];
        assert_eq!(
            validate_penalty(&penalty),
            Err(ValidationError::InvalidDuration("two".into()))
        );

        penalty.header.defects.clear();
        penalty.duration_minutes = None;
        assert_eq!(
            validate_penalty(&penalty),
            Err(ValidationError::MissingField("duration_minutes".into()))
        );
    }
}
