use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "proxychecker")]
#[command(version)]
#[command(about = "Checks which proxies in a list accept TCP connections", long_about = None)]
pub struct Cli {
    #[arg(value_name = "TARGET_FILE", help = "File with one host:port or \"host port\" per line")]
    pub target_file: Option<PathBuf>,

    #[arg(short, long, help = "Install the program on the system")]
    pub install: bool,

    #[arg(long, requires = "install", help = "Overwrite an existing installation")]
    pub force: bool,

    #[arg(short, long, value_name = "PATH", help = "Output file name [default: working_proxies.txt]")]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_name = "MS", help = "Connect timeout in milliseconds per proxy [default: 2000]")]
    pub timeout: Option<u64>,

    #[arg(long, value_enum, help = "Proxy type written in front of each line [default: socks5]")]
    pub proxy_type: Option<ProxyType>,

    #[arg(short, long, value_name = "PATH", help = "Read settings from this config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    #[default]
    #[value(name = "socks5")]
    Socks5,
    #[value(name = "socks4")]
    Socks4,
    #[value(name = "http")]
    Http,
}

impl std::fmt::Display for ProxyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyType::Socks5 => write!(f, "socks5"),
            ProxyType::Socks4 => write!(f, "socks4"),
            ProxyType::Http => write!(f, "http"),
        }
    }
}
