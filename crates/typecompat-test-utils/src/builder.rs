use std::collections::HashMap;

const CONSTANT_UTF8: u8 = 1;
const CONSTANT_CLASS: u8 = 7;
const CONSTANT_STRING: u8 = 8;

const ACC_PUBLIC_SUPER: u16 = 0x0021;
const ACC_PUBLIC_INTERFACE_ABSTRACT: u16 = 0x0601;
const MAJOR_JAVA_8: u16 = 52;

#[derive(Debug, Clone)]
enum InterfaceRef {
    Name(String),
    Raw(u16),
}

/// Builds minimal but well-formed classfiles.
///
/// Names are internal names (`com/example/Foo`). Classes and interfaces
/// default to `java/lang/Object` as their superclass, matching what `javac`
/// emits.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<InterfaceRef>,
    access_flags: u16,
    major_version: u16,
    minor_version: u16,
    fields: Vec<(String, String)>,
    methods: Vec<(String, String)>,
    attributes: Vec<(String, Vec<u8>)>,
    strings: Vec<Vec<u16>>,
}

impl ClassFileBuilder {
    pub fn class(internal_name: &str) -> Self {
        Self {
            this_class: internal_name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            access_flags: ACC_PUBLIC_SUPER,
            major_version: MAJOR_JAVA_8,
            minor_version: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            strings: Vec::new(),
        }
    }

    pub fn interface(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC_INTERFACE_ABSTRACT,
            ..Self::class(internal_name)
        }
    }

    pub fn internal_name(&self) -> &str {
        &self.this_class
    }

    pub fn extends(mut self, super_class: &str) -> Self {
        self.super_class = Some(super_class.to_string());
        self
    }

    pub fn no_super(mut self) -> Self {
        self.super_class = None;
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(InterfaceRef::Name(interface.to_string()));
        self
    }

    /// Reference an arbitrary constant pool slot from the interfaces table.
    pub fn raw_interface_index(mut self, index: u16) -> Self {
        self.interfaces.push(InterfaceRef::Raw(index));
        self
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.major_version = major;
        self.minor_version = minor;
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_string(), descriptor.to_string()));
        self
    }

    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push((name.to_string(), descriptor.to_string()));
        self
    }

    pub fn attribute(mut self, name: &str, info: &[u8]) -> Self {
        self.attributes.push((name.to_string(), info.to_vec()));
        self
    }

    /// Add a `CONSTANT_String` made of raw UTF-16 units. Unlike `&str`, this
    /// can carry unpaired surrogates (`"\uD800"` in Java source).
    pub fn string_constant(mut self, units: &[u16]) -> Self {
        self.strings.push(units.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut cp = PoolWriter::default();

        let this_index = cp.class(&self.this_class);
        let super_index = self.super_class.as_deref().map_or(0, |s| cp.class(s));
        let interface_indices: Vec<u16> = self
            .interfaces
            .iter()
            .map(|i| match i {
                InterfaceRef::Name(name) => cp.class(name),
                InterfaceRef::Raw(index) => *index,
            })
            .collect();
        let fields: Vec<(u16, u16)> = self
            .fields
            .iter()
            .map(|(name, desc)| (cp.utf8(name), cp.utf8(desc)))
            .collect();
        let methods: Vec<(u16, u16)> = self
            .methods
            .iter()
            .map(|(name, desc)| (cp.utf8(name), cp.utf8(desc)))
            .collect();
        let attributes: Vec<(u16, &[u8])> = self
            .attributes
            .iter()
            .map(|(name, info)| (cp.utf8(name), info.as_slice()))
            .collect();
        for units in &self.strings {
            cp.string(units);
        }

        let mut out = Vec::new();
        push_u32(&mut out, 0xCAFEBABE);
        push_u16(&mut out, self.minor_version);
        push_u16(&mut out, self.major_version);
        push_u16(&mut out, cp.next_index);
        out.extend_from_slice(&cp.bytes);

        push_u16(&mut out, self.access_flags);
        push_u16(&mut out, this_index);
        push_u16(&mut out, super_index);
        push_u16(&mut out, interface_indices.len() as u16);
        for index in interface_indices {
            push_u16(&mut out, index);
        }

        for members in [&fields, &methods] {
            push_u16(&mut out, members.len() as u16);
            for (name_index, descriptor_index) in members {
                push_u16(&mut out, 0x0001); // ACC_PUBLIC
                push_u16(&mut out, *name_index);
                push_u16(&mut out, *descriptor_index);
                push_u16(&mut out, 0); // attributes_count
            }
        }

        push_u16(&mut out, attributes.len() as u16);
        for (name_index, info) in attributes {
            push_u16(&mut out, name_index);
            push_u32(&mut out, info.len() as u32);
            out.extend_from_slice(info);
        }

        out
    }
}

struct PoolWriter {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for PoolWriter {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }
}

impl PoolWriter {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        let encoded = encode_modified_utf8(value);
        self.bytes.push(CONSTANT_UTF8);
        push_u16(&mut self.bytes, encoded.len() as u16);
        self.bytes.extend_from_slice(&encoded);
        let index = self.take_index();
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(index) = self.classes.get(name) {
            return *index;
        }
        let name_index = self.utf8(name);
        self.bytes.push(CONSTANT_CLASS);
        push_u16(&mut self.bytes, name_index);
        let index = self.take_index();
        self.classes.insert(name.to_string(), index);
        index
    }

    fn string(&mut self, units: &[u16]) -> u16 {
        let encoded = encode_units(units.iter().copied());
        self.bytes.push(CONSTANT_UTF8);
        push_u16(&mut self.bytes, encoded.len() as u16);
        self.bytes.extend_from_slice(&encoded);
        let utf8_index = self.take_index();
        self.bytes.push(CONSTANT_STRING);
        push_u16(&mut self.bytes, utf8_index);
        self.take_index()
    }

    fn take_index(&mut self) -> u16 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }
}

fn encode_modified_utf8(value: &str) -> Vec<u8> {
    encode_units(value.encode_utf16())
}

fn encode_units(units: impl Iterator<Item = u16>) -> Vec<u8> {
    let mut out = Vec::new();
    for unit in units {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
