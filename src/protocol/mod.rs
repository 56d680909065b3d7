//! Protocol Module
//!
//! The JSON-over-HTTP contract between clients and the service.
//!
//! ## Routes (also served under `/api`)
//! | Operation | Method/Path          | Response                          |
//! |-----------|----------------------|-----------------------------------|
//! | List page | GET `/clients`       | JSON array, length ≤ pageSize     |
//! | Count     | GET `/clients-all`   | `{"length": n}`                   |
//! | Create    | POST `/clients`      | inserted record incl. `_id`       |
//! | Update    | PUT `/clients/{id}`  | updated record, or `null`         |
//! | Delete    | DELETE `/clients/{id}` | `{"n": 0 or 1, "ok": 1}`        |
//!
//! ### List page parameters
//! - `filter`: case-insensitive regex, empty for none
//! - `sortField`: default `first_name`
//! - `sortOrder`: `asc` for ascending, anything else descending
//! - `pageNumber`: zero-based, unparsable values mean 0
//! - `pageSize`: required
//!
//! ### Status Codes
//! - 200: OK (a missing id on update/delete is still 200, see above)
//! - 204: CORS preflight
//! - 400: malformed request, invalid filter pattern, failed validation
//! - 404: unknown route
//! - 500: store failure
//! - 503: store timeout, cancelled query, or too many requests in flight

mod request;
mod response;

pub use request::{
    form_fields, json_fields, parse_id, CountParams, ListParams, Request, API_PREFIX,
};
pub use response::Response;
