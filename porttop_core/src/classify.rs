//! Service classification: an ordered chain of pure matchers, first hit wins.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    ReactNext,
    ReactAlt,
    Angular,
    FlaskRails,
    FlaskAdmin,
    DjangoHttp,
    TomcatHttp,
    General,
    MySql,
    PostgreSql,
    Redis,
    MongoDb,
    NodeJs,
    Python,
    Ruby,
    Java,
    Nginx,
    Apache,
    WebSocket,
    Unknown,
}

impl ServiceKind {
    pub fn label(self) -> &'static str {
        match self {
            ServiceKind::ReactNext => "React/Next.js",
            ServiceKind::ReactAlt => "React (alt)",
            ServiceKind::Angular => "Angular",
            ServiceKind::FlaskRails => "Flask/Rails",
            ServiceKind::FlaskAdmin => "Flask Admin",
            ServiceKind::DjangoHttp => "Django/HTTP",
            ServiceKind::TomcatHttp => "Tomcat/HTTP",
            ServiceKind::General => "General",
            ServiceKind::MySql => "MySQL",
            ServiceKind::PostgreSql => "PostgreSQL",
            ServiceKind::Redis => "Redis",
            ServiceKind::MongoDb => "MongoDB",
            ServiceKind::NodeJs => "Node.js",
            ServiceKind::Python => "Python",
            ServiceKind::Ruby => "Ruby",
            ServiceKind::Java => "Java",
            ServiceKind::Nginx => "Nginx",
            ServiceKind::Apache => "Apache",
            ServiceKind::WebSocket => "WebSocket",
            ServiceKind::Unknown => "Unknown",
        }
    }

    /// Terminal glyph for the kind. Rendering width is the UI's problem.
    pub fn icon(self) -> &'static str {
        match self {
            ServiceKind::ReactNext | ServiceKind::ReactAlt => "⚛",
            ServiceKind::Angular => "🅰",
            ServiceKind::FlaskRails | ServiceKind::FlaskAdmin | ServiceKind::DjangoHttp => "🧪",
            ServiceKind::TomcatHttp | ServiceKind::Nginx | ServiceKind::Apache => "🖥",
            ServiceKind::General => "🌐",
            ServiceKind::MySql | ServiceKind::PostgreSql | ServiceKind::MongoDb => "🗄",
            ServiceKind::Redis => "📦",
            ServiceKind::NodeJs => "⬢",
            ServiceKind::Python => "🐍",
            ServiceKind::Ruby => "💎",
            ServiceKind::Java => "☕",
            ServiceKind::WebSocket => "🔌",
            ServiceKind::Unknown => "?",
        }
    }
}

const KNOWN_PORTS: &[(u16, ServiceKind)] = &[
    (3000, ServiceKind::ReactNext),
    (3001, ServiceKind::ReactAlt),
    (4200, ServiceKind::Angular),
    (5000, ServiceKind::FlaskRails),
    (5001, ServiceKind::FlaskAdmin),
    (8000, ServiceKind::DjangoHttp),
    (8080, ServiceKind::TomcatHttp),
    (9000, ServiceKind::General),
    (3306, ServiceKind::MySql),
    (5432, ServiceKind::PostgreSql),
    (6379, ServiceKind::Redis),
    (27017, ServiceKind::MongoDb),
];

// Checked in order; the first needle found in the command wins.
const KNOWN_COMMANDS: &[(&str, ServiceKind)] = &[
    ("node", ServiceKind::NodeJs),
    ("python", ServiceKind::Python),
    ("ruby", ServiceKind::Ruby),
    ("java", ServiceKind::Java),
    ("nginx", ServiceKind::Nginx),
    ("apache", ServiceKind::Apache),
    ("postgres", ServiceKind::PostgreSql),
    ("mysql", ServiceKind::MySql),
    ("redis", ServiceKind::Redis),
    ("mongo", ServiceKind::MongoDb),
];

pub const WEBSOCKET_RANGE: Range<u16> = 18000..19000;

type Matcher = fn(u16, &str) -> Option<ServiceKind>;

const CHAIN: [Matcher; 3] = [by_port, by_command, by_port_range];

pub fn classify(port: u16, command: &str) -> ServiceKind {
    CHAIN
        .iter()
        .find_map(|matcher| matcher(port, command))
        .unwrap_or(ServiceKind::Unknown)
}

fn by_port(port: u16, _command: &str) -> Option<ServiceKind> {
    KNOWN_PORTS
        .iter()
        .find(|(p, _)| *p == port)
        .map(|(_, kind)| *kind)
}

fn by_command(_port: u16, command: &str) -> Option<ServiceKind> {
    let cmd = command.to_ascii_lowercase();
    KNOWN_COMMANDS
        .iter()
        .find(|(needle, _)| cmd.contains(*needle))
        .map(|(_, kind)| *kind)
}

fn by_port_range(port: u16, _command: &str) -> Option<ServiceKind> {
    WEBSOCKET_RANGE
        .contains(&port)
        .then_some(ServiceKind::WebSocket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_port_wins_over_command() {
        assert_eq!(classify(5432, "anything"), ServiceKind::PostgreSql);
        assert_eq!(classify(3000, "python3"), ServiceKind::ReactNext);
        assert_eq!(classify(27017, "node"), ServiceKind::MongoDb);
    }

    #[test]
    fn command_substring_is_case_insensitive() {
        assert_eq!(classify(9999, "python3.11"), ServiceKind::Python);
        assert_eq!(classify(9999, "Python"), ServiceKind::Python);
        assert_eq!(classify(9999, "com.docker.NODE"), ServiceKind::NodeJs);
        assert_eq!(classify(9999, "mongod"), ServiceKind::MongoDb);
        assert_eq!(classify(9999, "redis-ser"), ServiceKind::Redis);
    }

    #[test]
    fn command_beats_websocket_range() {
        assert_eq!(classify(18500, "node"), ServiceKind::NodeJs);
    }

    #[test]
    fn websocket_range_is_half_open() {
        assert_eq!(classify(18000, "foo"), ServiceKind::WebSocket);
        assert_eq!(classify(18500, "foo"), ServiceKind::WebSocket);
        assert_eq!(classify(18999, "foo"), ServiceKind::WebSocket);
        assert_eq!(classify(19000, "foo"), ServiceKind::Unknown);
        assert_eq!(classify(17999, "foo"), ServiceKind::Unknown);
    }

    #[test]
    fn fallback_is_unknown() {
        assert_eq!(classify(9999, "foo"), ServiceKind::Unknown);
        assert_eq!(ServiceKind::Unknown.label(), "Unknown");
    }
}
