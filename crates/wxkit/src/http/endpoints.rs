//! Endpoint paths and the response types the library decodes itself.

use serde::Deserialize;

// ============================================================================
// Basic
// ============================================================================

/// cgi-bin/token
pub const TOKEN_GRANT: &str = "/cgi-bin/token";

/// cgi-bin/getcallbackip
pub const CALLBACK_IPS: &str = "/cgi-bin/getcallbackip";

// ============================================================================
// Shake Around
// ============================================================================

pub const SHAKE_BIND_PAGE: &str = "/shakearound/device/bindpage";
pub const SHAKE_MATERIAL_ADD: &str = "/shakearound/material/add";
pub const SHAKE_DEVICE_APPLY: &str = "/shakearound/device/applyid";
pub const SHAKE_DEVICE_UPDATE: &str = "/shakearound/device/update";
pub const SHAKE_DEVICE_BIND_LOCATION: &str = "/shakearound/device/bindlocation";
pub const SHAKE_DEVICE_SEARCH: &str = "/shakearound/device/search";
pub const SHAKE_PAGE_ADD: &str = "/shakearound/page/add";
pub const SHAKE_PAGE_UPDATE: &str = "/shakearound/page/update";
pub const SHAKE_PAGE_SEARCH: &str = "/shakearound/page/search";
pub const SHAKE_PAGE_DELETE: &str = "/shakearound/page/delete";
pub const SHAKE_USER_INFO: &str = "/shakearound/user/getshakeinfo";
pub const SHAKE_DEVICE_STATISTICS: &str = "/shakearound/statistics/device";
pub const SHAKE_PAGE_STATISTICS: &str = "/shakearound/statistics/page";

// ============================================================================
// Card
// ============================================================================

pub const CARD_UPLOAD_IMAGE: &str = "/cgi-bin/media/uploadimg";
pub const CARD_COLORS: &str = "/card/getcolors";
pub const CARD_CREATE: &str = "/card/create";
pub const CARD_QRCODE_CREATE: &str = "/card/qrcode/create";
pub const CARD_CODE_UNAVAILABLE: &str = "/card/code/unavailable";
pub const CARD_CODE_DECRYPT: &str = "/card/code/decrypt";
pub const CARD_CODE_GET: &str = "/card/code/get";
pub const CARD_GET: &str = "/card/get";
pub const CARD_BATCH_GET: &str = "/card/batchget";
pub const CARD_UPDATE: &str = "/card/update";
pub const CARD_MODIFY_STOCK: &str = "/card/modifystock";
pub const CARD_CODE_UPDATE: &str = "/card/code/update";
pub const CARD_DELETE: &str = "/card/delete";

// ============================================================================
// Response Types
// ============================================================================

/// Response from the token grant.
#[derive(Debug, Deserialize)]
pub struct TokenGrantResponse {
    pub access_token: String,
    pub expires_in: i64,
}
