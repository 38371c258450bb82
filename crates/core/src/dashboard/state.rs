use crate::domain::{Analysis, AnalysisWithRecommendations, Campaign};

/// Everything the dashboard renders from. Front ends get a cloned snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub campaigns: Vec<Campaign>,
    pub analyses: Vec<Analysis>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<AnalysisWithRecommendations>,
    pub modal_open: bool,
}

/// A piece of state that actions overwrite wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Campaigns,
    Analyses,
    Selection,
}

#[derive(Debug, Default)]
pub(crate) struct Generations {
    campaigns: u64,
    analyses: u64,
    selection: u64,
}

impl Generations {
    fn counter(&mut self, slot: Slot) -> &mut u64 {
        match slot {
            Slot::Campaigns => &mut self.campaigns,
            Slot::Analyses => &mut self.analyses,
            Slot::Selection => &mut self.selection,
        }
    }

    pub(crate) fn bump(&mut self, slot: Slot) -> u64 {
        let counter = self.counter(slot);
        *counter += 1;
        *counter
    }

    pub(crate) fn current(&self, slot: Slot) -> u64 {
        match slot {
            Slot::Campaigns => self.campaigns,
            Slot::Analyses => self.analyses,
            Slot::Selection => self.selection,
        }
    }
}

/// Generation tokens taken when an action starts, one per slot it will write.
#[derive(Debug, Clone)]
pub struct Ticket {
    tokens: Vec<(Slot, u64)>,
}

impl Ticket {
    pub(crate) fn issue(generations: &mut Generations, slots: &[Slot]) -> Self {
        Self {
            tokens: slots
                .iter()
                .map(|&slot| (slot, generations.bump(slot)))
                .collect(),
        }
    }

    /// Slots for which this is still the latest action. Empty means fully superseded.
    pub(crate) fn fresh_slots(&self, generations: &Generations) -> Vec<Slot> {
        self.tokens
            .iter()
            .filter(|&&(slot, token)| generations.current(slot) == token)
            .map(|&(slot, _)| slot)
            .collect()
    }
}
