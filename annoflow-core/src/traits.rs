/// Validates feature type names against a controlled vocabulary.
///
/// Implementations are read-only after construction, so one checker can be
/// shared by any number of pipeline stages.
pub trait TypeChecker {
    /// Short description of where the vocabulary comes from.
    fn description(&self) -> String;

    /// `true` iff `type_name` is a known term.
    fn is_valid_type(&self, type_name: &str) -> bool;

    /// `true` iff `ancestor_type` is `child_type` or one of its is-a ancestors.
    /// Unknown names are never related to anything.
    fn is_a(&self, child_type: &str, ancestor_type: &str) -> bool;
}

impl<T: TypeChecker + ?Sized> TypeChecker for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn is_valid_type(&self, type_name: &str) -> bool {
        (**self).is_valid_type(type_name)
    }

    fn is_a(&self, child_type: &str, ancestor_type: &str) -> bool {
        (**self).is_a(child_type, ancestor_type)
    }
}

impl<T: TypeChecker + ?Sized> TypeChecker for Box<T> {
    fn description(&self) -> String {
        (**self).description()
    }

    fn is_valid_type(&self, type_name: &str) -> bool {
        (**self).is_valid_type(type_name)
    }

    fn is_a(&self, child_type: &str, ancestor_type: &str) -> bool {
        (**self).is_a(child_type, ancestor_type)
    }
}
