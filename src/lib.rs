pub mod fe;
