pub mod character;
pub mod match_record;
pub mod placement_record;
pub mod player_record;
pub mod rating_parameters;
pub mod winner;
