//! Code for populating the `.spec` file
use std::fmt::{Display, Formatter};

use crate::PackageAttributes;

const LICENSE: &str = "Fake License";
const URL: &str = "http://www.fake.rpm";
// Expanded by `rpmbuild`, not by us.
const BUILD_ROOT: &str = "%{_tmppath}/%{name}-%{version}-%{release}-root-%(%{__id_u} -n)";

// Header labels are padded so that values line up in this column.
const VALUE_COLUMN: usize = 16;

// There is nothing to build or install, so every section is left empty.
const BODY: &str = "\
%prep
%build
%install
%clean

%files

%changelog
* Thu Jan 1 2000 Nobody
- Wrote this sweet spec file

";

#[derive(Clone, Copy, Debug)]
pub(crate) struct SpecFile<'a>(&'a PackageAttributes);

impl<'a> SpecFile<'a> {
    pub(crate) fn new(attributes: &'a PackageAttributes) -> Self {
        Self(attributes)
    }
}

impl Display for SpecFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let PackageAttributes {
            name,
            group,
            summary,
            description,
            version,
            release,
            architecture,
            provides,
            requires,
            build_requires,
        } = self.0;

        writeln!(f)?;
        for (label, value) in [
            ("Name:", name.as_str()),
            ("Version:", version.as_str()),
            ("Release:", release.as_str()),
            ("Summary:", summary.as_str()),
            ("Group:", group.as_str()),
            ("License:", LICENSE),
            ("URL:", URL),
            ("BuildRoot:", BUILD_ROOT),
        ] {
            writeln!(f, "{label:<VALUE_COLUMN$}{value}")?;
        }

        writeln!(f, "{}", build_arch_field(architecture.as_deref()))?;
        writeln!(f, "{}", dependency_fields("BuildRequires", build_requires))?;
        writeln!(f, "{}", dependency_fields("Provides", provides))?;
        writeln!(f, "{}", dependency_fields("Requires", requires))?;
        writeln!(f)?;

        writeln!(f, "%description")?;
        writeln!(f, "{description}")?;
        writeln!(f)?;

        f.write_str(BODY)
    }
}

fn build_arch_field(architecture: Option<&str>) -> String {
    match architecture {
        Some(a) if !a.is_empty() => format!("BuildArch:\t{a}\n"),
        _ => String::new(),
    }
}

/// Format one `{keyword}:\t{capability}` line per capability.
///
/// The result always ends with a newline, so an empty list still yields one blank line in the
/// finished file.
fn dependency_fields(keyword: &str, capabilities: &[String]) -> String {
    let mut fields = capabilities
        .iter()
        .map(|c| format!("{keyword}:\t{c}"))
        .collect::<Vec<_>>()
        .join("\n");
    fields.push('\n');
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(attributes: &PackageAttributes) -> String {
        SpecFile::new(attributes).to_string()
    }

    fn lines_starting_with<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
        text.lines().filter(|l| l.starts_with(prefix)).collect()
    }

    #[test]
    fn renders_defaults_exactly() {
        let actual = render(&PackageAttributes::new("foo"));
        let expected = concat!(
            "\n",
            "Name:           foo\n",
            "Version:        1.0.0\n",
            "Release:        1.el5\n",
            "Summary:        This is a fake RPM that does nothing!\n",
            "Group:          Development/Build Tools\n",
            "License:        Fake License\n",
            "URL:            http://www.fake.rpm\n",
            "BuildRoot:      %{_tmppath}/%{name}-%{version}-%{release}-root-%(%{__id_u} -n)\n",
            // BuildArch
            "\n",
            // BuildRequires, Provides, Requires
            "\n\n",
            "\n\n",
            "\n\n",
            "\n",
            "%description\n",
            "This is a fake RPM that does nothing!\n",
            "\n",
            "%prep\n",
            "%build\n",
            "%install\n",
            "%clean\n",
            "\n",
            "%files\n",
            "\n",
            "%changelog\n",
            "* Thu Jan 1 2000 Nobody\n",
            "- Wrote this sweet spec file\n",
            "\n",
        );
        assert_eq!(actual, expected);
    }

    #[test]
    fn renders_every_attribute() {
        let mut attributes = PackageAttributes::new("foo");
        attributes.group = "Applications/System".to_string();
        attributes.summary = "A summary".to_string();
        attributes.description = "A longer description".to_string();
        attributes.version = "2.3.4".to_string();
        attributes.release = "7".to_string();
        attributes.architecture = Some("x86_64".to_string());
        attributes.provides = vec!["bar".to_string()];
        attributes.requires = vec!["baz >= 1.0".to_string()];
        attributes.build_requires = vec!["gcc".to_string(), "make".to_string()];

        let actual = render(&attributes);

        assert!(actual.contains("\nVersion:        2.3.4\n"));
        assert!(actual.contains("\nRelease:        7\n"));
        assert!(actual.contains("\nSummary:        A summary\n"));
        assert!(actual.contains("\nGroup:          Applications/System\n"));
        assert!(actual.contains("\n%description\nA longer description\n\n%prep\n"));
        assert!(actual.contains(concat!(
            "BuildArch:\tx86_64\n",
            "\n",
            "BuildRequires:\tgcc\n",
            "BuildRequires:\tmake\n",
            "\n",
            "Provides:\tbar\n",
            "\n",
            "Requires:\tbaz >= 1.0\n",
            "\n",
            "\n",
            "%description\n",
        )));
    }

    #[test]
    fn omits_build_arch_unless_given() {
        let mut attributes = PackageAttributes::new("foo");
        assert!(lines_starting_with(&render(&attributes), "BuildArch:").is_empty());

        attributes.architecture = Some(String::new());
        assert!(lines_starting_with(&render(&attributes), "BuildArch:").is_empty());

        attributes.architecture = Some("x86_64".to_string());
        assert_eq!(
            lines_starting_with(&render(&attributes), "BuildArch:"),
            vec!["BuildArch:\tx86_64"]
        );
    }

    #[test]
    fn dependency_fields_keep_order() {
        let capabilities = ["bar", "baz", "abc", "bar"].map(String::from);
        assert_eq!(
            dependency_fields("Provides", &capabilities),
            "Provides:\tbar\nProvides:\tbaz\nProvides:\tabc\nProvides:\tbar\n"
        );
    }

    #[test]
    fn dependency_fields_is_blank_line_when_empty() {
        assert_eq!(dependency_fields("Requires", &[]), "\n");
    }

    #[test]
    fn one_line_per_capability() {
        let mut attributes = PackageAttributes::new("foo");
        attributes.provides = vec!["bar".to_string(), "baz".to_string()];
        attributes.requires = (0..5).map(|i| format!("req{i}")).collect();
        let actual = render(&attributes);

        assert_eq!(
            lines_starting_with(&actual, "Provides:"),
            vec!["Provides:\tbar", "Provides:\tbaz"]
        );
        assert_eq!(
            lines_starting_with(&actual, "Requires:"),
            vec![
                "Requires:\treq0",
                "Requires:\treq1",
                "Requires:\treq2",
                "Requires:\treq3",
                "Requires:\treq4",
            ]
        );
        assert!(lines_starting_with(&actual, "BuildRequires:").is_empty());
    }

    #[test]
    fn values_are_not_escaped() {
        let mut attributes = PackageAttributes::new("%{weird} name");
        attributes.provides = vec!["a\nRequires:\tb".to_string()];
        let actual = render(&attributes);
        assert!(actual.contains("Name:           %{weird} name\n"));
        assert!(actual.contains("Provides:\ta\nRequires:\tb\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut attributes = PackageAttributes::new("foo");
        attributes.requires = vec!["bar".to_string()];
        assert_eq!(render(&attributes), render(&attributes));
    }
}
