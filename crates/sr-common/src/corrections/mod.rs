pub mod contract_type;
pub mod english_skill;
pub mod flow_depth;
pub mod japanese_skill;
pub mod nationality;
pub mod remote_onsite;
pub mod station;
pub mod tech_kubun;
pub mod todofuken;

pub use contract_type::{
    correct_contract_type, correct_gender, correct_talent_contract_type,
    normalize_contract_type_for_matching,
};
