//! ExpiryFuse: Room の無活動タイマー
//!
//! 状態遷移:
//!
//! ```text
//! Armed(deadline) --reset(now)------------------> Armed(now + idle_timeout)
//! Armed(deadline) --try_expire(now >= deadline)--> Expired   (一度だけ)
//! Expired         --*--------------------------->  Expired   (終端)
//! ```
//!
//! この型は純粋な状態機械で、待機は行わない。待機と teardown は
//! `Room::burn` が Room のロックを取った状態で `try_expire` を呼ぶことで行う。

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FuseState {
    Armed { deadline: Instant },
    Expired,
}

#[derive(Debug, Clone)]
pub struct ExpiryFuse {
    idle_timeout: Duration,
    state: FuseState,
}

impl ExpiryFuse {
    /// `now` を最後の活動時刻として点火する
    pub fn armed(now: Instant, idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            state: FuseState::Armed {
                deadline: now + idle_timeout,
            },
        }
    }

    /// 期限を `now + idle_timeout` に延長する。Expired の場合は false
    pub fn reset(&mut self, now: Instant) -> bool {
        match self.state {
            FuseState::Armed { .. } => {
                self.state = FuseState::Armed {
                    deadline: now + self.idle_timeout,
                };
                true
            }
            FuseState::Expired => false,
        }
    }

    /// 期限に達していれば Expired に遷移する。遷移した呼び出しでのみ true
    pub fn try_expire(&mut self, now: Instant) -> bool {
        match self.state {
            FuseState::Armed { deadline } if now >= deadline => {
                self.state = FuseState::Expired;
                true
            }
            _ => false,
        }
    }

    /// 期限を待たずに Expired に遷移する（サーバー停止時）。遷移した呼び出しでのみ true
    pub fn expire_now(&mut self) -> bool {
        match self.state {
            FuseState::Armed { .. } => {
                self.state = FuseState::Expired;
                true
            }
            FuseState::Expired => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            FuseState::Armed { deadline } => Some(deadline),
            FuseState::Expired => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state == FuseState::Expired
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}
