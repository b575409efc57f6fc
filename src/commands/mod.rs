pub mod general;
pub mod leaderboard;
pub mod lookup;
pub mod record;
pub mod tileevent;

pub use general::{help, ping};
pub use leaderboard::leaderboard;
pub use lookup::lookup;
pub use record::record;
pub use tileevent::tileevent;

use crate::{Data, Error};

/// Every slash command the bot serves. Registration with Discord and
/// dispatch both come from this list.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help(),
        ping(),
        leaderboard(),
        lookup(),
        record(),
        tileevent(),
    ]
}
