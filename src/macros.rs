//! Helpers for writing container boxes by hand: looking up a typed child
//! (or all children of a type) inside a `Vec<MP4Box>`, and declaring the
//! typed accessor methods a container box exposes for its well-known
//! children.

/// Find the first box of type $type in $vec.
macro_rules! first_box {
    (@FIELD $val:expr, SampleDescriptionBox) => {
        &$val.entries
    };
    (@FIELD $val:expr, $type:ident) => {
        &$val.boxes
    };
    (@MAIN $vec:expr, $type:ident) => {
        {
            let _x: Option<&$type> = iter_box!($vec, $type).next();
            _x
        }
    };
    (@MAIN $vec:expr, $type:ident $(/$path:ident)+) => {
        first_box!($vec, $type).and_then(|x| {
            let _i = first_box!(@FIELD x, $type);
            first_box!(@MAIN _i, $($path) / *)
        })
    };
    ($vec:ident, $type:ident $($tt:tt)*) => {
        first_box!(@MAIN $vec.boxes, $type $($tt)*)
    };
    ($vec:expr, $type:ident $($tt:tt)*) => {
        first_box!(@MAIN $vec, $type $($tt)*)
    };
}

/// Find the first box of type $type in $vec, mutable.
macro_rules! first_box_mut {
    (@FIELD $val:expr, SampleDescriptionBox) => {
        &mut $val.entries
    };
    (@FIELD $val:expr, $type:ident) => {
        &mut $val.boxes
    };
    (@MAIN $vec:expr, $type:ident) => {
        {
            let _x: Option<&mut $type> = iter_box_mut!($vec, $type).next();
            _x
        }
    };
    (@MAIN $vec:expr, $type:ident $(/$path:ident)+) => {
        first_box_mut!($vec, $type).and_then(|mut x| {
            let &mut _i = first_box_mut!(@FIELD x, $type);
            first_box_mut!(@MAIN _i, $($path) / *)
        })
    };
    ($vec:ident, $type:ident $($tt:tt)*) => {
        first_box_mut!(@MAIN $vec.boxes, $type $($tt)*)
    };
    ($vec:expr, $type:ident $($tt:tt)*) => {
        first_box_mut!(@MAIN $vec, $type $($tt)*)
    };
}

/// Find all boxes of type $type in $vec.
macro_rules! iter_box {
    ($vec:ident, $type:ident) => {
        iter_box!($vec.boxes, $type)
    };
    ($vec:expr, $type:ident) => {
        $vec.iter().filter_map(|x| {
            match x {
                &MP4Box::$type(ref b) => Some(b),
                _ => None,
            }
        })
    };
}

macro_rules! iter_box_mut {
    ($vec:ident, $type:ident) => {
        iter_box_mut!($vec.boxes, $type)
    };
    ($vec:expr, $type:ident) => {
        $vec.iter_mut().filter_map(|x| {
            match x {
                &mut MP4Box::$type(ref mut b) => Some(b),
                _ => None,
            }
        })
    };
}

macro_rules! declare_box_methods {
    ($type:ident, $method:ident, $method_mut:ident) => {
        /// Get a reference to the $type.
        pub fn $method(&self) -> &$type {
            first_box!(&self.boxes, $type).unwrap()
        }
        /// Get a mutable reference to the $type.
        pub fn $method_mut(&mut self) -> &mut $type {
            first_box_mut!(&mut self.boxes, $type).unwrap()
        }
    }
}

macro_rules! declare_box_methods_opt {
    ($type:ident, $method:ident, $method_mut:ident) => {
        /// Get an optional reference to the $type.
        pub fn $method(&self) -> Option<&$type> {
            first_box!(&self.boxes, $type)
        }
        /// Get an optional mutable reference to the $type.
        pub fn $method_mut(&mut self) -> Option<&mut $type> {
            first_box_mut!(&mut self.boxes, $type)
        }
    }
}
