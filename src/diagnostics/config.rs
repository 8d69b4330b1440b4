use std::str::FromStr;

/// Selects which source lines a pass will print a trace for.
#[derive(Clone, Debug, PartialEq)]
pub enum TracingConfig {
    All,
    Between(usize, usize),
    Before(usize),
    After(usize),
    Only(usize),
    Off,
}

impl TracingConfig {
    /// Returns true if a trace should be printed for source line `ln`
    pub fn includes(&self, ln: u32) -> bool {
        let ln = ln as usize;
        match self {
            TracingConfig::Only(l) => ln == *l,
            TracingConfig::Before(l) => ln <= *l,
            TracingConfig::After(l) => ln >= *l,
            TracingConfig::Between(start, end) => ln >= *start && ln <= *end,
            TracingConfig::All => true,
            TracingConfig::Off => false,
        }
    }
}

impl FromStr for TracingConfig {
    type Err = String;

    /// Parses `all`, `off`, `N`, `N:M`, `:N` and `N:`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_line = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line number in trace range: {}", s))
        };

        match s.trim() {
            "all" => Ok(TracingConfig::All),
            "off" => Ok(TracingConfig::Off),
            range => match range.find(':') {
                None => Ok(TracingConfig::Only(parse_line(range)?)),
                Some(idx) => {
                    let (start, end) = (&range[..idx], &range[idx + 1..]);
                    match (start.trim().is_empty(), end.trim().is_empty()) {
                        (true, true) => Ok(TracingConfig::All),
                        (true, false) => Ok(TracingConfig::Before(parse_line(end)?)),
                        (false, true) => Ok(TracingConfig::After(parse_line(start)?)),
                        (false, false) => {
                            let (start, end) = (parse_line(start)?, parse_line(end)?);
                            if start > end {
                                Err(format!("Trace range starts after it ends: {}", s))
                            } else {
                                Ok(TracingConfig::Between(start, end))
                            }
                        }
                    }
                }
            },
        }
    }
}

pub trait Tracing {
    fn set_tracing(&mut self, config: TracingConfig);
}
