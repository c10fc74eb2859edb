pub mod locate_station;
