// market-cli: command-line front end for market-common

pub mod cli;
