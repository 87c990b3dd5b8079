use std::collections::HashSet;

use crate::log::{Message, MessageId};

/// Token identifying one staged (not yet confirmed) submission.
pub type StageToken = u64;

/// Client-side reconciliation of snapshot, live events, and optimistic
/// sends.
///
/// The intended use is the join protocol: subscribe, apply the snapshot,
/// then feed every live event through `apply_event`, which filters out the
/// events the snapshot already contained. A send is staged under a
/// provisional id and replaced by the server's record when `confirm` is
/// called with the result of the submission; the server record is
/// authoritative.
#[derive(Debug, Default)]
pub struct ClientSync {
    confirmed: Vec<Message>,
    seen: HashSet<MessageId>,
    staged: Vec<StagedEntry>,
    next_provisional: MessageId,
}

#[derive(Debug)]
struct StagedEntry {
    token: StageToken,
    message: Message,
}

impl ClientSync {
    pub fn new() -> Self {
        Self {
            confirmed: Vec::new(),
            seen: HashSet::new(),
            staged: Vec::new(),
            // Provisional ids count down from the top of the id space so
            // they can never collide with a server-assigned id.
            next_provisional: MessageId::MAX,
        }
    }

    /// Seeds the confirmed history from a snapshot read.
    pub fn apply_snapshot(&mut self, snapshot: Vec<Message>) {
        for message in snapshot {
            self.apply_event(message);
        }
    }

    /// Applies one confirmed record; returns false for a duplicate.
    ///
    /// Records are kept in id order even if events arrive interleaved with
    /// out-of-band confirmations.
    pub fn apply_event(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }
        let position = self
            .confirmed
            .iter()
            .rposition(|m| m.id < message.id)
            .map_or(0, |p| p + 1);
        self.confirmed.insert(position, message);
        true
    }

    /// Stages an optimistic local entry for a submission in flight.
    pub fn stage(&mut self, sender: String, payload: String, is_image: bool) -> StageToken {
        let token = self.next_provisional;
        self.next_provisional -= 1;
        self.staged.push(StagedEntry {
            token,
            message: Message {
                id: token,
                sender,
                payload,
                is_image,
            },
        });
        token
    }

    /// Replaces a staged entry with the server's authoritative record.
    ///
    /// Safe to call after the record already arrived as a live event; the
    /// staged entry is dropped either way.
    pub fn confirm(&mut self, token: StageToken, message: Message) {
        self.staged.retain(|entry| entry.token != token);
        self.apply_event(message);
    }

    /// Drops a staged entry whose submission was rejected.
    pub fn discard(&mut self, token: StageToken) {
        self.staged.retain(|entry| entry.token != token);
    }

    /// Confirmed history in id order, followed by staged entries.
    pub fn messages(&self) -> Vec<Message> {
        let mut view = self.confirmed.clone();
        view.extend(self.staged.iter().map(|entry| entry.message.clone()));
        view
    }
}
