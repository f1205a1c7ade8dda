use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub correct_answers_today: u64,
    pub daily_goal: u32,
    pub goal_reached: bool,
}

impl DailyProgress {
    pub fn new(correct_answers_today: u64, daily_goal: u32) -> Self {
        Self {
            correct_answers_today,
            daily_goal,
            goal_reached: correct_answers_today >= u64::from(daily_goal),
        }
    }
}
