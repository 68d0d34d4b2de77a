#![no_main]

use libfuzzer_sys::fuzz_target;
use typecompat_classfile::{ClassFile, TypeDescriptor};

mod utils;

fuzz_target!(|data: &[u8]| {
    let data = utils::truncate(data);

    let parsed = ClassFile::parse(data);
    let descriptor = TypeDescriptor::parse(data);

    // A descriptor only comes out of a classfile that parsed.
    if let Ok(descriptor) = descriptor {
        assert!(parsed.is_ok());
        assert!(!descriptor.name.contains('/'));
        assert!(descriptor.direct_supertypes().all(|name| !name.contains('/')));
    }
});
