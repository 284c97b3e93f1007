//! Stage router
//!
//! Decides which screen is mounted for the store's current stage and reports
//! the unmount/mount pair whenever that changes.

use crate::sim::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    IntroScreen,
    PlanetSelector,
    TravelMinigame,
    ColonyBuilder,
    MissionFailed,
}

impl Screen {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Intro => Screen::IntroScreen,
            Stage::PlanetSelection => Screen::PlanetSelector,
            Stage::Travel => Screen::TravelMinigame,
            Stage::Civilization => Screen::ColonyBuilder,
            Stage::GameOver => Screen::MissionFailed,
        }
    }

    /// DOM element id of the screen container
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::IntroScreen => "screen-intro",
            Screen::PlanetSelector => "screen-select",
            Screen::TravelMinigame => "screen-travel",
            Screen::ColonyBuilder => "screen-colony",
            Screen::MissionFailed => "screen-gameover",
        }
    }

    pub const ALL: [Screen; 5] = [
        Screen::IntroScreen,
        Screen::PlanetSelector,
        Screen::TravelMinigame,
        Screen::ColonyBuilder,
        Screen::MissionFailed,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Screen to tear down (`None` on the very first mount)
    pub unmount: Option<Screen>,
    pub mount: Screen,
}

#[derive(Debug, Clone, Default)]
pub struct StageRouter {
    mounted: Option<Screen>,
}

impl StageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted(&self) -> Option<Screen> {
        self.mounted
    }

    /// Align the mounted screen with `stage`
    pub fn sync(&mut self, stage: Stage) -> Option<Transition> {
        let target = Screen::for_stage(stage);
        if self.mounted == Some(target) {
            return None;
        }
        let transition = Transition {
            unmount: self.mounted,
            mount: target,
        };
        log::debug!("Router: {:?} -> {:?}", transition.unmount, target);
        self.mounted = Some(target);
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sync_mounts() {
        let mut router = StageRouter::new();
        assert_eq!(
            router.sync(Stage::Intro),
            Some(Transition { unmount: None, mount: Screen::IntroScreen })
        );
        assert_eq!(router.mounted(), Some(Screen::IntroScreen));
    }

    #[test]
    fn test_transition_only_on_change() {
        let mut router = StageRouter::new();
        router.sync(Stage::Travel);
        assert_eq!(router.sync(Stage::Travel), None);
        assert_eq!(
            router.sync(Stage::GameOver),
            Some(Transition {
                unmount: Some(Screen::TravelMinigame),
                mount: Screen::MissionFailed
            })
        );
    }
}
