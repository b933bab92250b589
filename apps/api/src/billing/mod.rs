// Premium access: payment ledger, manual admin approval, and the
// entitlement state machine that decides unlocked / pending / locked.

pub mod entitlement;
pub mod handlers;
pub mod ledger;
