//! Fixed, phase-indexed guidance text.

use crate::insights::phase::Phase;

pub const NOT_ENOUGH_DATA_TITLE: &str = "Not enough data";
pub const NOT_ENOUGH_DATA_DESCRIPTION: &str = "Track at least 2 periods to get cycle insights.";
pub const NOT_ENOUGH_DATA_RECOMMENDATION: &str =
    "Regular tracking helps identify patterns in your cycle and symptoms.";

pub const CYCLE_RECOMMENDATION: &str =
    "Regular cycles generally indicate good hormonal balance, though some variation is normal.";
pub const SYMPTOM_RECOMMENDATION: &str =
    "Consider tracking the severity and timing of these symptoms to identify patterns.";
pub const NUTRITION_RECOMMENDATION: &str =
    "Adjusting your diet according to your cycle phases may help manage symptoms.";
pub const EXERCISE_RECOMMENDATION: &str =
    "Listen to your body and adjust exercise intensity based on your energy levels.";
pub const TREND_RECOMMENDATION: &str =
    "Stress, sleep, travel and changes in weight can all shift cycle length. Mention lasting changes to your healthcare provider.";
pub const SUMMARY_CLOSING: &str =
    "Pay attention to how your body feels, as this can provide valuable insights about your hormonal health.";

pub fn phase_description(phase: Phase, day_of_cycle: i64) -> String {
    match phase {
        Phase::Menstrual => format!(
            "You're currently on day {day_of_cycle} of your cycle, in your menstrual phase. \
             Your body is shedding the uterine lining as your period."
        ),
        Phase::Follicular => format!(
            "You're on day {day_of_cycle} of your cycle, in the follicular phase. \
             Your body is preparing eggs for possible release and rebuilding the uterine lining."
        ),
        Phase::Ovulation => format!(
            "You're on day {day_of_cycle} of your cycle, in your ovulation phase. \
             An egg is being released from the ovary, making this your most fertile time."
        ),
        Phase::Luteal => format!(
            "You're on day {day_of_cycle} of your cycle, in the luteal phase. \
             Your body is preparing for possible pregnancy, and if the egg isn't fertilized, you'll begin your period."
        ),
    }
}

/// Short clause describing what the body is doing, used in the summary paragraph.
pub fn phase_activity(phase: Phase) -> &'static str {
    match phase {
        Phase::Menstrual => "shedding your uterine lining",
        Phase::Follicular => "building up your uterine lining as estrogen rises",
        Phase::Ovulation => "likely releasing an egg and at your most fertile",
        Phase::Luteal => "in the post-ovulation phase where progesterone rises",
    }
}

pub fn phase_recommendation(phase: Phase) -> &'static str {
    match phase {
        Phase::Menstrual => {
            "Focus on rest and gentle activities. Iron-rich foods can help replenish what's lost during menstruation."
        }
        Phase::Follicular => {
            "This is a great time for new projects and higher intensity workouts as energy levels rise with estrogen."
        }
        Phase::Ovulation => {
            "If you're trying to conceive, this is your most fertile time. If not, be mindful of protection during sexual activity."
        }
        Phase::Luteal => {
            "Self-care is important as PMS symptoms may appear. Complex carbs can help with mood stability."
        }
    }
}

pub fn nutrition(phase: Phase) -> &'static str {
    match phase {
        Phase::Menstrual => {
            "Focus on iron-rich foods like leafy greens, lentils, and grass-fed red meat to replenish what's lost during bleeding."
        }
        Phase::Follicular => {
            "Emphasize foods high in B vitamins and zinc such as eggs, legumes, and whole grains to support follicle development."
        }
        Phase::Ovulation => {
            "Incorporate antioxidant-rich fruits and vegetables, healthy fats from avocados and olive oil, and fermented foods."
        }
        Phase::Luteal => {
            "Choose complex carbs like sweet potatoes, calcium-rich foods, and magnesium-rich foods like dark chocolate to help manage PMS symptoms."
        }
    }
}

pub fn exercise(phase: Phase) -> &'static str {
    match phase {
        Phase::Menstrual => {
            "Gentle activities like walking, light yoga, or swimming can help relieve cramps and boost mood without overtaxing your body."
        }
        Phase::Follicular => {
            "Take advantage of increasing energy with high-intensity workouts, strength training, or cardio activities that challenge you."
        }
        Phase::Ovulation => {
            "Your body is at peak performance with higher testosterone levels. Great time for strength training, HIIT, or group fitness classes."
        }
        Phase::Luteal => {
            "As energy decreases, moderate activities like pilates, light strength training, or hiking can help manage mood changes and bloating."
        }
    }
}
