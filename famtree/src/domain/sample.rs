//! Reference family used by the command line and the tests.

use crate::domain::arena::FamilyTree;
use crate::domain::builder::FamilyTreeBuilder;
use crate::domain::error::TreeResult;

/// Five generations descending from Qempa'.
///
/// ```text
/// Qempa' (2256) [17]
/// ├─ Thok Mak (2281) [127]
/// │  ├─ Ag'ax (2317) [611]
/// │  ├─ K'alaga (2302) [561]
/// │  └─ Samtoq (2317) [702]
/// └─ Worf (2290) [290]
///    └─ Mogh (2310) [490]
///       ├─ Worf (2340) [390]
///       │  ├─ K'Dhan (2388) [898]
///       │  └─ Alexander Rozhenko (2366) [1000]
///       │     └─ D'Vak (2390) [253]
///       └─ Kurn (2345) [590]
///          ├─ Grehka (2359) [429]
///          ├─ Elumen (2357) [106]
///          └─ Ga'ga (2366) [101]
/// ```
pub fn qempa_family() -> TreeResult<FamilyTree> {
    FamilyTreeBuilder::new()
        .person(17, "Qempa'", 2256)
        .person(127, "Thok Mak", 2281)
        .person(290, "Worf", 2290)
        .person(390, "Worf", 2340)
        .person(490, "Mogh", 2310)
        .person(590, "Kurn", 2345)
        .person(611, "Ag'ax", 2317)
        .person(561, "K'alaga", 2302)
        .person(702, "Samtoq", 2317)
        .person(898, "K'Dhan", 2388)
        .person(429, "Grehka", 2359)
        .person(1000, "Alexander Rozhenko", 2366)
        .person(253, "D'Vak", 2390)
        .person(106, "Elumen", 2357)
        .person(101, "Ga'ga", 2366)
        .children(17, [127, 290])
        .children(390, [898, 1000])
        .children(1000, [253])
        .children(127, [611, 561, 702])
        .children(590, [429, 106, 101])
        .children(490, [390, 590])
        .children(290, [490])
        .children(702, [])
        .build()
}
