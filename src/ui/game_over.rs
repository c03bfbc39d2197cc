//! Game-over screen model

use serde::Serialize;

use crate::highscores::LeaderboardState;

/// Characters of a name shown in a ranking row
pub const ROW_NAME_CHARS: usize = 12;

/// Row styling by placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            _ => RankTier::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    /// 1-indexed
    pub rank: usize,
    pub name: String,
    pub score: u64,
    pub tier: RankTier,
    /// Row belongs to the current player (drawn highlighted)
    pub is_player: bool,
}

impl RankRow {
    pub fn line(&self) -> String {
        format!("{}. {} - {}", self.rank, self.name, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RankingsView {
    Loading,
    Empty,
    Rows(Vec<RankRow>),
}

/// Everything the game-over screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOverView {
    pub score: u64,
    /// Beat the personal best known when the run ended
    pub new_best: bool,
    /// Best before this run when `new_best`, otherwise the current best
    pub best: u64,
    pub rankings: RankingsView,
    pub player_name: Option<String>,
}

impl GameOverView {
    /// `best_at_crash` is the personal best known when the run ended, so the
    /// "new best" banner survives the upload raising the stored best.
    pub fn build(
        score: u64,
        best_at_crash: u64,
        board: &LeaderboardState,
        loading: bool,
        player_name: Option<&str>,
    ) -> Self {
        let new_best = score > best_at_crash;
        let best = if new_best {
            best_at_crash
        } else {
            board.personal_best.max(best_at_crash)
        };

        let rankings = if loading {
            RankingsView::Loading
        } else if board.global.is_empty() {
            RankingsView::Empty
        } else {
            RankingsView::Rows(
                board
                    .global
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| RankRow {
                        rank: i + 1,
                        name: e.name.chars().take(ROW_NAME_CHARS).collect(),
                        score: e.score,
                        tier: RankTier::for_rank(i + 1),
                        is_player: player_name == Some(e.name.as_str()),
                    })
                    .collect(),
            )
        };

        Self {
            score,
            new_best,
            best,
            rankings,
            player_name: player_name.map(str::to_string),
        }
    }

    /// Headline lines under the score
    pub fn best_lines(&self) -> Vec<String> {
        if self.new_best {
            vec![
                "NEW PERSONAL BEST!".to_string(),
                format!("Previous Best: {}", self.best),
            ]
        } else {
            vec![format!("Personal Best: {}", self.best)]
        }
    }

    /// Full screen as text, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["GAME OVER".to_string(), format!("Your Score: {}", self.score)];
        lines.extend(self.best_lines());
        lines.push("GLOBAL TOP 10".to_string());
        match &self.rankings {
            RankingsView::Loading => lines.push("Loading global rankings...".to_string()),
            RankingsView::Empty => lines.push("No global rankings yet".to_string()),
            RankingsView::Rows(rows) => lines.extend(rows.iter().map(RankRow::line)),
        }
        if let Some(name) = &self.player_name {
            lines.push(format!("Player: {name}"));
        }
        lines.push("Press SPACE to play again".to_string());
        lines
    }
}
