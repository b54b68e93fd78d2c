//! Identity cookie payload
//!
//! Cookie の値は、この構造体の JSON を base64（標準アルファベット）でエンコードしたもの。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCookieDto {
    pub id: String,
    pub name: String,
}
