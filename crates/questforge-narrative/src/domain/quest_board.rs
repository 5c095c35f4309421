//! Quest board: templated quests offered when the player asks for work.

use chrono::{DateTime, Utc};
use questforge_core::rng::DeterministicRng;
use questforge_world_state::domain::model::{Quest, QuestLog, QuestStatus, QuestType};
use uuid::Uuid;

/// A quest before it is offered.
#[derive(Debug, Clone, Copy)]
pub struct QuestTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub quest_giver: &'static str,
    pub xp_reward: u32,
    pub gold_reward: Option<u32>,
    pub objectives: &'static [&'static str],
    pub quest_type: QuestType,
}

impl QuestTemplate {
    /// A fresh proposal built from this template.
    #[must_use]
    pub fn instantiate(&self, now: DateTime<Utc>) -> Quest {
        Quest {
            id: Uuid::new_v4(),
            title: self.title.to_owned(),
            description: self.description.to_owned(),
            quest_giver: self.quest_giver.to_owned(),
            xp_reward: self.xp_reward,
            gold_reward: self.gold_reward,
            status: QuestStatus::Active,
            created_at: now,
            completed_at: None,
            objectives: (!self.objectives.is_empty())
                .then(|| self.objectives.iter().map(|&o| o.to_owned()).collect()),
            quest_type: self.quest_type,
        }
    }
}

/// Experience for the scenario's main quest.
pub const MAIN_QUEST_XP: u32 = 300;
/// Gold for the scenario's main quest.
pub const MAIN_QUEST_GOLD: u32 = 100;

pub static SIDE_QUESTS: &[QuestTemplate] = &[
    QuestTemplate {
        title: "Rats in the Cellar",
        description: "Something has been gnawing through the ale casks below the tavern.",
        quest_giver: "Barkeep Odo",
        xp_reward: 50,
        gold_reward: Some(10),
        objectives: &["Clear the tavern cellar"],
        quest_type: QuestType::Side,
    },
    QuestTemplate {
        title: "The Missing Locket",
        description: "Old Mira lost her late husband's locket somewhere along the Old Road.",
        quest_giver: "Old Mira",
        xp_reward: 75,
        gold_reward: None,
        objectives: &["Search the Old Road", "Return the locket to Mira"],
        quest_type: QuestType::Side,
    },
    QuestTemplate {
        title: "Wolves at the Gate",
        description: "A pack has been harrying travelers on the road into town.",
        quest_giver: "Captain Hale",
        xp_reward: 100,
        gold_reward: Some(25),
        objectives: &["Drive off the wolf pack"],
        quest_type: QuestType::Side,
    },
    QuestTemplate {
        title: "Herbs for the Healer",
        description: "The town healer needs fresh silverleaf from the Whispering Woods before dusk.",
        quest_giver: "Healer Brenna",
        xp_reward: 25,
        gold_reward: Some(5),
        objectives: &["Gather silverleaf"],
        quest_type: QuestType::Daily,
    },
    QuestTemplate {
        title: "Caravan Escort",
        description: "A spice merchant wants a guard for the day's run to the next village.",
        quest_giver: "Merchant Tobiah",
        xp_reward: 40,
        gold_reward: Some(15),
        objectives: &["Escort the caravan safely"],
        quest_type: QuestType::Daily,
    },
];

/// Picks the next quest to offer, or `None` when the board has nothing new.
///
/// While the main slot is empty and no main quest is pending, the offer is
/// the scenario's main quest. Otherwise one side or daily template is drawn
/// uniformly, skipping titles already in the log and skipping daily quests
/// while the current-mission slot holds an active quest.
pub fn offer(
    log: &QuestLog,
    scenario_title: &str,
    rng: &mut dyn DeterministicRng,
    now: DateTime<Utc>,
) -> Option<Quest> {
    let main_pending = log.pending.iter().any(|q| q.quest_type == QuestType::Main);
    if log.main_quest.is_none() && !main_pending {
        return Some(main_quest(scenario_title, now));
    }

    let mission_busy = log
        .current_mission
        .as_ref()
        .is_some_and(|q| q.status == QuestStatus::Active);
    let known = |title: &str| {
        log.pending
            .iter()
            .chain(log.accepted())
            .any(|q| q.title == title)
    };
    let candidates: Vec<&QuestTemplate> = SIDE_QUESTS
        .iter()
        .filter(|t| !known(t.title))
        .filter(|t| !(mission_busy && t.quest_type == QuestType::Daily))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let last = u32::try_from(candidates.len() - 1).unwrap_or(0);
    let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
    candidates
        .get(index)
        .map(|template| template.instantiate(now))
}

/// Describes an offered quest the way its giver would.
#[must_use]
pub fn describe_offer(quest: &Quest) -> String {
    let mut text = format!(
        "{} leans in. \"{}\" {} ({} XP",
        quest.quest_giver, quest.title, quest.description, quest.xp_reward
    );
    if let Some(gold) = quest.gold_reward {
        text.push_str(&format!(", {gold} gold"));
    }
    text.push_str(") Will you accept?");
    text
}

fn main_quest(scenario_title: &str, now: DateTime<Utc>) -> Quest {
    Quest {
        id: Uuid::new_v4(),
        title: scenario_title.to_owned(),
        description: format!("Get to the bottom of the trouble behind {scenario_title}."),
        quest_giver: "Barkeep Odo".to_owned(),
        xp_reward: MAIN_QUEST_XP,
        gold_reward: Some(MAIN_QUEST_GOLD),
        status: QuestStatus::Active,
        created_at: now,
        completed_at: None,
        objectives: Some(vec![
            "Follow the rumors".to_owned(),
            "Confront the source of the trouble".to_owned(),
        ]),
        quest_type: QuestType::Main,
    }
}
