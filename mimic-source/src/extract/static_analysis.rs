use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use mimic_model::{InterfaceModel, Method, Parameter, ResultValue, TypeRef};

use crate::syntax::{GoParser, GoSource, Import, ImportTable, InterfaceDecl, Member, TypeExpr};
use crate::{Error, PackageLocator, Result, package};

/// The parsed non-test files of one package.
struct PackageIndex {
    package_name: String,
    dir: PathBuf,
    files: Vec<GoSource>,
}

impl PackageIndex {
    fn find_interface(&self, name: &str) -> Option<(&GoSource, &InterfaceDecl)> {
        self.files
            .iter()
            .find_map(|file| file.interface(name).map(|decl| (file, decl)))
    }

    fn declares_type(&self, name: &str) -> bool {
        self.files.iter().any(|file| file.declares_type(name))
    }
}

/// Where an interface declaration lives.
struct DeclSite<'s> {
    package_path: &'s str,
    package_name: &'s str,
    dir: &'s Path,
    imports: &'s [Import],
}

/// Builds interface models from Go sources, following embedded interfaces
/// across packages.
pub struct StaticAnalyzer<'a> {
    locator: &'a PackageLocator,
    parser: GoParser,
    packages: HashMap<String, PackageIndex>,
}

impl<'a> StaticAnalyzer<'a> {
    pub fn new(locator: &'a PackageLocator) -> Result<Self> {
        Ok(Self {
            locator,
            parser: GoParser::new()?,
            packages: HashMap::new(),
        })
    }

    /// Model of interface `name` declared in the package at `dir`.
    pub fn interface(&mut self, package_path: &str, dir: &Path, name: &str) -> Result<InterfaceModel> {
        let mut stack = Vec::new();
        let methods = self.methods_of(package_path, dir, name, &mut stack)?;
        let package_name = self.index(package_path, dir)?.package_name.clone();

        let mut model = InterfaceModel::new(name, package_path, package_name);
        model.methods = methods;
        Ok(model)
    }

    /// Model of an interface declared in an already parsed file.
    pub fn interface_in_file(
        &mut self,
        file: &GoSource,
        decl: &InterfaceDecl,
        package_path: &str,
    ) -> Result<InterfaceModel> {
        let dir = file.path.parent().unwrap_or_else(|| Path::new("."));
        let site = DeclSite {
            package_path,
            package_name: &file.package_name,
            dir,
            imports: &file.imports,
        };
        let mut stack = vec![(package_path.to_string(), decl.name.clone())];
        let methods = self.expand(decl, &site, &mut stack)?;

        let mut model = InterfaceModel::new(&decl.name, package_path, &file.package_name);
        model.methods = methods;
        Ok(model)
    }

    fn index(&mut self, package_path: &str, dir: &Path) -> Result<&PackageIndex> {
        if !self.packages.contains_key(package_path) {
            let index = self.load(package_path, dir)?;
            self.packages.insert(package_path.to_string(), index);
        }
        self.packages
            .get(package_path)
            .ok_or_else(|| Error::package_not_found(package_path, None))
    }

    fn load(&mut self, package_path: &str, dir: &Path) -> Result<PackageIndex> {
        let paths = package::go_files(dir).map_err(|_| {
            Error::package_not_found(
                package_path,
                Some(format!("cannot read directory {}", dir.display())),
            )
        })?;
        if paths.is_empty() {
            return Err(Error::package_not_found(
                package_path,
                Some(format!("no Go files in {}", dir.display())),
            ));
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            files.push(self.parser.parse_file(path)?);
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for file in &files {
            *counts.entry(file.package_name.as_str()).or_default() += 1;
        }
        let max = counts.values().copied().max().unwrap_or(0);
        let package_name = counts
            .iter()
            .find(|(_, n)| **n == max)
            .map(|(name, _)| name.to_string())
            .unwrap_or_default();
        files.retain(|f| f.package_name == package_name);

        tracing::debug!(
            package = package_path,
            files = files.len(),
            "parsed package sources"
        );

        Ok(PackageIndex {
            package_name,
            dir: dir.to_path_buf(),
            files,
        })
    }

    fn methods_of(
        &mut self,
        package_path: &str,
        dir: &Path,
        name: &str,
        stack: &mut Vec<(String, String)>,
    ) -> Result<Vec<Method>> {
        let key = (package_path.to_string(), name.to_string());
        if stack.contains(&key) {
            return Err(Error::unresolvable(
                name,
                package_path,
                "interface embeds itself",
            ));
        }

        let index = self.index(package_path, dir)?;
        let Some((file, decl)) = index.find_interface(name) else {
            if index.declares_type(name) {
                return Err(Error::not_an_interface(name, package_path));
            }
            return Err(Error::interface_not_found(
                name,
                package_path,
                Some(format!("searched {}", index.dir.display())),
            ));
        };

        let decl = decl.clone();
        let imports = file.imports.clone();
        let package_name = index.package_name.clone();
        let dir = index.dir.clone();

        stack.push(key);
        let site = DeclSite {
            package_path,
            package_name: &package_name,
            dir: &dir,
            imports: &imports,
        };
        let methods = self.expand(&decl, &site, stack);
        stack.pop();
        methods
    }

    fn expand(
        &mut self,
        decl: &InterfaceDecl,
        site: &DeclSite<'_>,
        stack: &mut Vec<(String, String)>,
    ) -> Result<Vec<Method>> {
        if let Some(reason) = &decl.unsupported {
            return Err(Error::unresolvable(&decl.name, site.package_path, reason));
        }

        let locator = self.locator;
        let imports = ImportTable::new(site.imports, |path| real_package_name(locator, path));
        let resolve = |ty: &TypeExpr| {
            ty.resolve(site.package_path, &imports)
                .map_err(|reason| Error::unresolvable(&decl.name, site.package_path, reason))
        };

        let mut methods: Vec<Method> = Vec::new();

        for member in &decl.members {
            match member {
                Member::Method(method) => {
                    let mut parameters = Vec::with_capacity(method.params.len());
                    for param in &method.params {
                        parameters.push(Parameter {
                            name: param.name.clone().unwrap_or_default(),
                            ty: resolve(&param.ty)?,
                            is_variadic: param.is_variadic,
                        });
                    }
                    let mut results = Vec::with_capacity(method.results.len());
                    for result in &method.results {
                        results.push(ResultValue {
                            ty: resolve(result)?,
                        });
                    }
                    push(
                        &mut methods,
                        Method {
                            name: method.name.clone(),
                            parameters,
                            results,
                        },
                    );
                }
                Member::Embedded(TypeExpr::Name(name)) if name == "error" => {
                    push(
                        &mut methods,
                        Method::new("Error").returns(TypeRef::builtin("string")),
                    );
                }
                Member::Embedded(TypeExpr::Name(name)) if name == "any" => {}
                Member::Embedded(TypeExpr::Name(name)) => {
                    let embedded = self.methods_of(site.package_path, site.dir, name, stack)?;
                    for method in embedded {
                        push(&mut methods, method);
                    }
                }
                Member::Embedded(TypeExpr::Qualified { qualifier, name }) => {
                    let Some(path) = imports.lookup(qualifier).map(str::to_string) else {
                        return Err(Error::unresolvable(
                            format!("{}.{}", qualifier, name),
                            site.package_path,
                            format!("unknown package qualifier '{}'", qualifier),
                        ));
                    };
                    let Some(dir) = self.locator.locate(&path) else {
                        return Err(Error::package_not_found(
                            &path,
                            Some(format!(
                                "embedded by {}.{}; not found in the module, vendor/ or GOROOT",
                                site.package_name, decl.name
                            )),
                        ));
                    };
                    let embedded = self.methods_of(&path, &dir, name, stack)?;
                    for method in embedded {
                        push(&mut methods, method);
                    }
                }
                Member::Embedded(other) => {
                    return Err(Error::unresolvable(
                        format!("{:?}", other),
                        site.package_path,
                        "only named interfaces can be embedded",
                    ));
                }
            }
        }

        Ok(methods)
    }
}

/// Embedded method sets may overlap; the first declaration wins.
fn push(methods: &mut Vec<Method>, method: Method) {
    if !methods.iter().any(|m| m.name == method.name) {
        methods.push(method);
    }
}

/// Package name of a non-standard import read from its sources.
fn real_package_name(locator: &PackageLocator, import_path: &str) -> Option<String> {
    let first = import_path.split('/').next()?;
    if !first.contains('.') {
        return None;
    }
    let dir = locator.locate(import_path)?;
    package::declared_package_name(&dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GoModule;
    use mimic_model::ChanDir;
    use std::fs;

    struct Fixture {
        _temp: tempfile::TempDir,
        root: PathBuf,
        locator: PackageLocator,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(root.join("go.mod"), "module example.com/app\n").unwrap();
        for (path, content) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let locator = PackageLocator::new(&root, GoModule::find(&root).unwrap());
        Fixture {
            _temp: temp,
            root,
            locator,
        }
    }

    #[test]
    fn test_keeps_names_and_order() {
        let fx = fixture(&[(
            "store/store.go",
            r#"package store

import "time"

type Store interface {
	Put(key string, value []byte, ttl time.Duration) error
	Get(key string) ([]byte, bool)
	Watch(prefix string, opts ...Option) <-chan Event
}

type Option func(*settings)
type Event struct{}
type settings struct{}
"#,
        )]);

        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();
        let model = analyzer
            .interface("example.com/app/store", &fx.root.join("store"), "Store")
            .unwrap();

        assert_eq!(model.package_name, "store");
        let names: Vec<_> = model.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Put", "Get", "Watch"]);

        let put = &model.methods[0];
        assert_eq!(put.parameters[2].name, "ttl");
        assert_eq!(put.parameters[2].ty, TypeRef::named("time", "Duration"));
        assert!(put.results[0].ty.is_error());

        let watch = &model.methods[2];
        assert!(watch.is_variadic());
        assert_eq!(
            watch.parameters[1].ty,
            TypeRef::named("example.com/app/store", "Option")
        );
        assert_eq!(
            watch.results[0].ty,
            TypeRef::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(TypeRef::named("example.com/app/store", "Event")),
            }
        );
    }

    #[test]
    fn test_embedded_interfaces() {
        let fx = fixture(&[
            (
                "base/base.go",
                "package base\n\ntype Closer interface {\n\tClose() error\n}\n",
            ),
            (
                "svc/svc.go",
                r#"package svc

import "example.com/app/base"

type Named interface {
	Name() string
}

type Service interface {
	Named
	base.Closer
	error
	Start(ctx string) error
}
"#,
            ),
        ]);

        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();
        let model = analyzer
            .interface("example.com/app/svc", &fx.root.join("svc"), "Service")
            .unwrap();
        let names: Vec<_> = model.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Close", "Error", "Start"]);
    }

    #[test]
    fn test_not_found_and_not_interface() {
        let fx = fixture(&[(
            "p/p.go",
            "package p\n\ntype Config struct{}\n\ntype Api interface{ Ping() }\n",
        )]);
        let dir = fx.root.join("p");
        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();

        let err = analyzer.interface("example.com/app/p", &dir, "Config").unwrap_err();
        assert!(matches!(*err, Error::NotAnInterfaceType { .. }));

        let err = analyzer.interface("example.com/app/p", &dir, "Missing").unwrap_err();
        assert!(matches!(*err, Error::InterfaceNotFound { .. }));
    }

    #[test]
    fn test_empty_directory_is_package_not_found() {
        let fx = fixture(&[]);
        fs::create_dir(fx.root.join("empty")).unwrap();
        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();
        let err = analyzer
            .interface("example.com/app/empty", &fx.root.join("empty"), "X")
            .unwrap_err();
        assert!(matches!(*err, Error::PackageNotFound { .. }));
    }

    #[test]
    fn test_self_embedding_is_reported() {
        let fx = fixture(&[(
            "loop/loop.go",
            "package loop\n\ntype A interface {\n\tB\n}\n\ntype B interface {\n\tA\n}\n",
        )]);
        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();
        let err = analyzer
            .interface("example.com/app/loop", &fx.root.join("loop"), "A")
            .unwrap_err();
        assert!(matches!(*err, Error::UnresolvableType { .. }));
    }

    #[test]
    fn test_ignores_files_of_other_packages() {
        let fx = fixture(&[
            ("m/a.go", "package m\n\ntype Api interface{ Ping() }\n"),
            ("m/b.go", "package m\n"),
            ("m/tool.go", "package main\n\ntype Api interface{ Other() }\n"),
        ]);
        let mut analyzer = StaticAnalyzer::new(&fx.locator).unwrap();
        let model = analyzer
            .interface("example.com/app/m", &fx.root.join("m"), "Api")
            .unwrap();
        assert_eq!(model.methods[0].name, "Ping");
    }
}
