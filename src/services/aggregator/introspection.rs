use std::fmt::Write;

use crate::services::mpris::{
    APP_INTERFACE, INTROSPECTABLE_INTERFACE, OBJECT_PATH, PEER_INTERFACE, PLAYER_INTERFACE,
    PROPERTIES_INTERFACE,
};

use super::extension::ExtensionInterface;

const DOCTYPE: &str = "<!DOCTYPE node PUBLIC \"-//freedesktop//DTD D-BUS Object Introspection 1.0//EN\"\n \"http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd\">";

/// Direction of a method argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Passed by the caller
    In,
    /// Returned to the caller
    Out,
}

/// Access mode of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read only
    Read,
    /// Read and write
    ReadWrite,
}

/// One method or signal argument
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    /// Argument name
    pub name: &'static str,
    /// Bus type signature
    pub signature: &'static str,
    /// Direction; ignored for signal arguments
    pub direction: Direction,
}

impl ArgSpec {
    /// Input argument
    pub const fn input(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature,
            direction: Direction::In,
        }
    }

    /// Output argument
    pub const fn output(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature,
            direction: Direction::Out,
        }
    }
}

/// One method of an interface
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    /// Member name
    pub name: &'static str,
    /// Arguments in call order
    pub args: &'static [ArgSpec],
}

/// One signal of an interface
#[derive(Debug, Clone, Copy)]
pub struct SignalSpec {
    /// Member name
    pub name: &'static str,
    /// Signal arguments
    pub args: &'static [ArgSpec],
}

/// One property of an interface
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    /// Property name
    pub name: &'static str,
    /// Bus type signature
    pub signature: &'static str,
    /// Access mode
    pub access: Access,
    /// Whether `PropertiesChanged` is emitted for it
    pub emits_changed: bool,
}

const fn read(name: &'static str, signature: &'static str) -> PropertySpec {
    PropertySpec {
        name,
        signature,
        access: Access::Read,
        emits_changed: true,
    }
}

const fn read_write(name: &'static str, signature: &'static str) -> PropertySpec {
    PropertySpec {
        name,
        signature,
        access: Access::ReadWrite,
        emits_changed: true,
    }
}

/// A statically declared interface
#[derive(Debug, Clone, Copy)]
pub struct InterfaceSpec {
    /// Interface name
    pub name: &'static str,
    /// Methods
    pub methods: &'static [MethodSpec],
    /// Signals
    pub signals: &'static [SignalSpec],
    /// Properties
    pub properties: &'static [PropertySpec],
}

/// The interfaces the aggregator always exports, in advertised order
pub static STANDARD_INTERFACES: &[InterfaceSpec] = &[
    InterfaceSpec {
        name: PEER_INTERFACE,
        methods: &[
            MethodSpec { name: "Ping", args: &[] },
            MethodSpec {
                name: "GetMachineId",
                args: &[ArgSpec::output("machine_uuid", "s")],
            },
        ],
        signals: &[],
        properties: &[],
    },
    InterfaceSpec {
        name: INTROSPECTABLE_INTERFACE,
        methods: &[MethodSpec {
            name: "Introspect",
            args: &[ArgSpec::output("data", "s")],
        }],
        signals: &[],
        properties: &[],
    },
    InterfaceSpec {
        name: PROPERTIES_INTERFACE,
        methods: &[
            MethodSpec {
                name: "Get",
                args: &[
                    ArgSpec::input("interface", "s"),
                    ArgSpec::input("property", "s"),
                    ArgSpec::output("value", "v"),
                ],
            },
            MethodSpec {
                name: "GetAll",
                args: &[
                    ArgSpec::input("interface", "s"),
                    ArgSpec::output("properties", "a{sv}"),
                ],
            },
            MethodSpec {
                name: "Set",
                args: &[
                    ArgSpec::input("interface", "s"),
                    ArgSpec::input("property", "s"),
                    ArgSpec::input("value", "v"),
                ],
            },
        ],
        signals: &[SignalSpec {
            name: "PropertiesChanged",
            args: &[
                ArgSpec::output("interface", "s"),
                ArgSpec::output("changed_properties", "a{sv}"),
                ArgSpec::output("invalidated_properties", "as"),
            ],
        }],
        properties: &[],
    },
    InterfaceSpec {
        name: PLAYER_INTERFACE,
        methods: &[
            MethodSpec { name: "Next", args: &[] },
            MethodSpec { name: "Previous", args: &[] },
            MethodSpec { name: "Pause", args: &[] },
            MethodSpec { name: "PlayPause", args: &[] },
            MethodSpec { name: "Stop", args: &[] },
            MethodSpec { name: "Play", args: &[] },
            MethodSpec {
                name: "Seek",
                args: &[ArgSpec::input("offset", "x")],
            },
            MethodSpec {
                name: "SetPosition",
                args: &[
                    ArgSpec::input("track_id", "o"),
                    ArgSpec::input("position", "x"),
                ],
            },
            MethodSpec {
                name: "OpenUri",
                args: &[ArgSpec::input("uri", "s")],
            },
        ],
        signals: &[SignalSpec {
            name: "Seeked",
            args: &[ArgSpec::output("position", "x")],
        }],
        properties: &[
            read("PlaybackStatus", "s"),
            read_write("LoopStatus", "s"),
            read_write("Rate", "d"),
            read_write("Shuffle", "b"),
            read_write("Volume", "d"),
            PropertySpec {
                emits_changed: false,
                ..read("Position", "x")
            },
            read("MinimumRate", "d"),
            read("MaximumRate", "d"),
            read("CanGoNext", "b"),
            read("CanGoPrevious", "b"),
            read("CanPlay", "b"),
            read("CanPause", "b"),
            read("CanSeek", "b"),
            PropertySpec {
                emits_changed: false,
                ..read("CanControl", "b")
            },
            read("Metadata", "a{sv}"),
        ],
    },
    InterfaceSpec {
        name: APP_INTERFACE,
        methods: &[
            MethodSpec {
                name: "Raise",
                args: &[],
            },
            MethodSpec {
                name: "Quit",
                args: &[],
            },
        ],
        signals: &[],
        properties: &[
            read("CanQuit", "b"),
            read_write("Fullscreen", "b"),
            read("CanSetFullscreen", "b"),
            read("CanRaise", "b"),
            read("HasTrackList", "b"),
            read("Identity", "s"),
            read("DesktopEntry", "s"),
            read("SupportedUriSchemes", "as"),
            read("SupportedMimeTypes", "as"),
        ],
    },
];

/// Render the introspection document for the aggregator object.
///
/// The standard interfaces come first, followed by one interface per
/// registered extension whose methods are taken from its operation table.
pub fn render(extensions: &[&'static ExtensionInterface]) -> String {
    let mut xml = String::new();
    let _ = writeln!(xml, "{DOCTYPE}");
    let _ = writeln!(xml, "<node name=\"{OBJECT_PATH}\">");

    for interface in STANDARD_INTERFACES {
        write_interface(
            &mut xml,
            interface.name,
            interface.methods.iter(),
            interface.signals,
            interface.properties,
        );
    }

    for extension in extensions {
        write_interface(
            &mut xml,
            extension.name,
            extension.operations.iter().map(|operation| &operation.method),
            &[],
            &[],
        );
    }

    xml.push_str("</node>\n");
    xml
}

fn write_interface<'a>(
    xml: &mut String,
    name: &str,
    methods: impl Iterator<Item = &'a MethodSpec>,
    signals: &[SignalSpec],
    properties: &[PropertySpec],
) {
    let _ = writeln!(xml, "  <interface name=\"{name}\">");

    for method in methods {
        write_member(xml, "method", method.name, method.args, true);
    }

    for signal in signals {
        write_member(xml, "signal", signal.name, signal.args, false);
    }

    for property in properties {
        let access = match property.access {
            Access::Read => "read",
            Access::ReadWrite => "readwrite",
        };
        let tag = format!(
            "<property name=\"{}\" type=\"{}\" access=\"{access}\"",
            property.name, property.signature
        );
        if property.emits_changed {
            let _ = writeln!(xml, "    {tag}/>");
        } else {
            let _ = writeln!(xml, "    {tag}>");
            let _ = writeln!(
                xml,
                "      <annotation name=\"org.freedesktop.DBus.Property.EmitsChangedSignal\" value=\"false\"/>"
            );
            let _ = writeln!(xml, "    </property>");
        }
    }

    let _ = writeln!(xml, "  </interface>");
}

fn write_member(xml: &mut String, kind: &str, name: &str, args: &[ArgSpec], directed: bool) {
    if args.is_empty() {
        let _ = writeln!(xml, "    <{kind} name=\"{name}\"/>");
        return;
    }

    let _ = writeln!(xml, "    <{kind} name=\"{name}\">");
    for arg in args {
        let direction = match (directed, arg.direction) {
            (false, _) => String::new(),
            (true, Direction::In) => " direction=\"in\"".to_string(),
            (true, Direction::Out) => " direction=\"out\"".to_string(),
        };
        let _ = writeln!(
            xml,
            "      <arg name=\"{}\" type=\"{}\"{direction}/>",
            arg.name, arg.signature
        );
    }
    let _ = writeln!(xml, "    </{kind}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregator::extension::MUSICWAND_INTERFACE;

    #[test]
    fn standard_document_lists_every_exported_interface() {
        let xml = render(&[]);

        assert!(xml.starts_with("<!DOCTYPE node"));
        for interface in [
            PEER_INTERFACE,
            INTROSPECTABLE_INTERFACE,
            PROPERTIES_INTERFACE,
            PLAYER_INTERFACE,
            APP_INTERFACE,
        ] {
            assert!(xml.contains(&format!("<interface name=\"{interface}\">")));
        }
        assert!(xml.trim_end().ends_with("</node>"));
    }

    #[test]
    fn methods_carry_typed_arguments() {
        let xml = render(&[]);

        assert!(xml.contains("<method name=\"SetPosition\">"));
        assert!(xml.contains("<arg name=\"track_id\" type=\"o\" direction=\"in\"/>"));
        assert!(xml.contains("<method name=\"PlayPause\"/>"));
    }

    #[test]
    fn position_is_annotated_as_not_emitting_changes() {
        let xml = render(&[]);

        assert!(xml.contains(
            "<property name=\"Position\" type=\"x\" access=\"read\">\n      <annotation"
        ));
        assert!(xml.contains("<property name=\"Volume\" type=\"d\" access=\"readwrite\"/>"));
    }

    #[test]
    fn registered_extensions_are_appended_after_standard_interfaces() {
        let without = render(&[]);
        let with = render(&[&MUSICWAND_INTERFACE]);

        assert!(!without.contains(MUSICWAND_INTERFACE.name));
        let app_at = with.find(&format!("<interface name=\"{APP_INTERFACE}\">"));
        let ext_at = with.find(&format!("<interface name=\"{}\">", MUSICWAND_INTERFACE.name));
        assert!(matches!((app_at, ext_at), (Some(app), Some(ext)) if app < ext));
        assert!(with.contains("<method name=\"SetCurrentPlayer\">"));
        assert!(with.contains("<arg name=\"name\" type=\"s\" direction=\"in\"/>"));
    }
}
