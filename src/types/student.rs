use serde::{Deserialize, Serialize};

/// A student to be seated.
///
/// Serialized as `{name, rollNo, class}` at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub roll_no: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl Student {
    pub fn new(
        roll_no: impl Into<String>,
        name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            roll_no: roll_no.into(),
            name: name.into(),
            class_name: class_name.into(),
        }
    }
}

/// Ordered list of students; order is source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    #[inline]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.students.iter()
    }
}

impl FromIterator<Student> for Roster {
    fn from_iter<I: IntoIterator<Item = Student>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.students.iter()
    }
}
