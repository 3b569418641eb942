pub mod blocks;
pub mod extract;
pub mod sections;

use crate::model::WorkItem;
use extract::WorkDetail;

/// Block model → section locator → derived views.
pub fn process_work(work: &WorkItem) -> WorkDetail {
    extract::extract_all(work)
}
