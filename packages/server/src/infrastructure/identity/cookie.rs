//! Cookie を使った ClientIdentifier 実装
//!
//! Cookie `fuse_chat_cookie` に base64(JSON `{"id", "name"}`) を格納する。
//! Cookie がない・壊れている・ID が UUID でない場合は、新しい ID と
//! 「形容詞-動物」形式の名前を発行して `Set-Cookie` を返す。

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::seq::SliceRandom;

use crate::{
    domain::{Client, ClientId, ClientIdentifier, ClientName, Identification},
    infrastructure::dto::cookie::ClientCookieDto,
};

pub const COOKIE_NAME: &str = "fuse_chat_cookie";
const DEFAULT_MAX_AGE_SECS: u64 = 3600;

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "clever", "eager", "fancy", "gentle", "happy", "jolly", "kind", "lively",
    "lucky", "mellow", "nimble", "proud", "quiet", "rapid", "shy", "sunny", "swift", "witty",
];

const ANIMALS: &[&str] = &[
    "badger", "beaver", "falcon", "ferret", "gecko", "heron", "ibis", "koala", "lemur", "lynx",
    "marten", "newt", "otter", "panda", "quail", "raven", "seal", "stoat", "tapir", "wombat",
];

#[derive(Debug, Clone)]
pub struct CookieClientIdentifier {
    cookie_name: String,
    max_age_secs: u64,
}

impl Default for CookieClientIdentifier {
    fn default() -> Self {
        Self::new(COOKIE_NAME, DEFAULT_MAX_AGE_SECS)
    }
}

impl CookieClientIdentifier {
    pub fn new(cookie_name: impl Into<String>, max_age_secs: u64) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            max_age_secs,
        }
    }

    /// `Cookie` ヘッダから自分の Cookie を取り出して Client に復元する
    fn parse(&self, cookie_header: &str) -> Option<Client> {
        let value = cookie_header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == self.cookie_name).then_some(value)
        })?;

        let json = STANDARD.decode(value.trim_matches('"')).ok()?;
        let dto: ClientCookieDto = serde_json::from_slice(&json).ok()?;
        Client::try_from(dto).ok()
    }

    /// `Set-Cookie` ヘッダの値を作る
    pub fn encode(&self, client: &Client) -> Option<String> {
        let json = serde_json::to_vec(&ClientCookieDto::from(client)).ok()?;
        Some(format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=Lax",
            self.cookie_name,
            STANDARD.encode(json),
            self.max_age_secs
        ))
    }

    fn issue(&self) -> Client {
        let name = ClientName::new(generate_petname()).unwrap_or_else(|_| ClientName::anonymous());
        Client::new(ClientId::generate(), name)
    }
}

/// 「形容詞-動物」形式のランダムな名前
pub fn generate_petname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quiet");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("otter");
    format!("{adjective}-{animal}")
}

impl ClientIdentifier for CookieClientIdentifier {
    fn identify(&self, cookie_header: Option<&str>) -> Identification {
        if let Some(client) = cookie_header.and_then(|header| self.parse(header)) {
            return Identification {
                client,
                set_cookie: None,
            };
        }

        let client = self.issue();
        tracing::debug!(client_id = client.id.as_str(), "issued new client identity");

        Identification {
            set_cookie: self.encode(&client),
            client,
        }
    }
}
